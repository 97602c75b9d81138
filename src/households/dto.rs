use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateHouseholdRequest {
    pub name: String,
    pub family_size: Option<i32>,
    pub weekly_budget: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHouseholdRequest {
    pub name: Option<String>,
    pub family_size: Option<i32>,
    pub weekly_budget: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub email: String,
}
