pub mod client;
pub mod planner;
pub mod recipe;

pub use client::{AnthropicClient, TextGenerator};

use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/households/:id/plans/generate",
            post(planner::generate_plan),
        )
        .route("/recipes", post(recipe::get_recipe))
}

/// Models are told to emit JSON only, but still wrap it in markdown fences
/// often enough that both orchestrators strip them before parsing.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    s = s.trim_start();
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}

pub fn parse_generated<T: DeserializeOwned>(raw: &str) -> Result<T, AppError> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| AppError::Generation(format!("Generated content did not parse: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn leaves_unfenced_content_alone() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(strip_code_fences("  \n{\"a\": 1}\n  "), "{\"a\": 1}");
    }

    #[test]
    fn parse_generated_rejects_non_json() {
        let err = parse_generated::<serde_json::Value>("here is your plan!").unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }

    #[test]
    fn parse_generated_accepts_fenced_json() {
        let v: serde_json::Value = parse_generated("```json\n{\"ok\": true}\n```").expect("parses");
        assert_eq!(v["ok"], true);
    }
}
