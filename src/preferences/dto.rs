use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Liked,
    Disliked,
}

impl Preference {
    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Liked => "liked",
            Preference::Disliked => "disliked",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreferenceRequest {
    pub meal_type: MealType,
    pub meal_description: String,
    pub preference: Preference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_deserialize_lowercase() {
        let req: PreferenceRequest = serde_json::from_str(
            r#"{"meal_type":"dinner","meal_description":"Veggie Stir Fry","preference":"liked"}"#,
        )
        .expect("parses");
        assert_eq!(req.meal_type, MealType::Dinner);
        assert_eq!(req.preference, Preference::Liked);
    }

    #[test]
    fn unknown_meal_type_is_rejected() {
        let err = serde_json::from_str::<PreferenceRequest>(
            r#"{"meal_type":"brunch","meal_description":"x","preference":"liked"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown variant"));
    }
}
