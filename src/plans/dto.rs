use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// The generated plan document, embedded verbatim in a stored plan row.
/// Field names match the generation wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDocument {
    pub family_size: i32,
    pub weekly_budget: f64,
    pub estimated_weekly_total: String,
    pub days: Vec<MealDay>,
    pub groceries: BTreeMap<String, Vec<GroceryItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealDay {
    pub day: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub dinner_cost: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroceryItem {
    pub item: String,
    pub price: String,
}

/// A plan document must hold exactly seven days, Monday through Sunday in
/// order. Store labels are free text and not checked.
///
/// Returns the failure as a plain message: who is at fault depends on where
/// the document came from, so callers pick the error category — Generation
/// when the model produced it, Validation when a client submitted it.
pub fn validate_document(document: &MealPlanDocument) -> Result<(), String> {
    if document.days.len() != 7 {
        return Err(format!(
            "Plan must contain exactly 7 days, got {}",
            document.days.len()
        ));
    }
    for (day, expected) in document.days.iter().zip(WEEKDAYS) {
        if !day.day.eq_ignore_ascii_case(expected) {
            return Err(format!(
                "Plan days out of order: expected {expected}, got {}",
                day.day
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SavePlanRequest {
    pub plan: MealPlanDocument,
}

#[cfg(test)]
pub(crate) fn sample_document() -> MealPlanDocument {
    let days = WEEKDAYS
        .iter()
        .map(|day| MealDay {
            day: day.to_string(),
            breakfast: "Oatmeal with fruit".into(),
            lunch: "Turkey sandwiches".into(),
            dinner: "Veggie Stir Fry".into(),
            dinner_cost: "$12".into(),
        })
        .collect();
    let mut groceries = BTreeMap::new();
    groceries.insert(
        "Costco (~$80)".to_string(),
        vec![GroceryItem {
            item: "Rice (10 lb)".into(),
            price: "$9".into(),
        }],
    );
    MealPlanDocument {
        family_size: 4,
        weekly_budget: 300.0,
        estimated_weekly_total: "$280".into(),
        days,
        groceries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn sample_document_is_valid() {
        validate_document(&sample_document()).expect("valid");
    }

    #[test]
    fn rejects_short_week() {
        let mut doc = sample_document();
        doc.days.pop();
        let err = validate_document(&doc).unwrap_err();
        assert!(err.contains("exactly 7"));
    }

    #[test]
    fn rejects_days_out_of_order() {
        let mut doc = sample_document();
        doc.days.swap(0, 6);
        let err = validate_document(&doc).unwrap_err();
        assert!(err.contains("out of order"));
    }

    #[test]
    fn client_submitted_invalid_document_is_a_bad_request() {
        use axum::{http::StatusCode, response::IntoResponse};

        // The save path wraps validation failures as client errors, not as
        // upstream generation failures.
        let mut doc = sample_document();
        doc.days.pop();
        let err = validate_document(&doc).map_err(AppError::Validation).unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn model_produced_invalid_document_is_a_bad_gateway() {
        use axum::{http::StatusCode, response::IntoResponse};

        let mut doc = sample_document();
        doc.days.pop();
        let err = validate_document(&doc).map_err(AppError::Generation).unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn accepts_case_variations_in_day_labels() {
        let mut doc = sample_document();
        doc.days[0].day = "MONDAY".into();
        validate_document(&doc).expect("still valid");
    }

    #[test]
    fn document_round_trips_with_camel_case_keys() {
        let doc = sample_document();
        let json = serde_json::to_value(&doc).expect("serializes");
        assert!(json.get("familySize").is_some());
        assert!(json.get("estimatedWeeklyTotal").is_some());
        assert!(json["days"][0].get("dinnerCost").is_some());
        let back: MealPlanDocument = serde_json::from_value(json).expect("deserializes");
        assert_eq!(back, doc);
    }

    #[test]
    fn generated_plan_avoids_exact_disliked_collisions() {
        // Informal check from the household scenario: a document built with
        // "Liver" disliked should not surface it verbatim in any meal slot.
        let doc = sample_document();
        let disliked = ["Liver"];
        for day in &doc.days {
            for meal in [&day.breakfast, &day.lunch, &day.dinner] {
                assert!(!disliked.contains(&meal.as_str()));
            }
        }
    }
}
