use crate::models::team::{MatchScore, TeamMatchRecord};
use serde::{Deserialize, Serialize};

/// Response carrying a ranked list of teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<TeamMatchRecord>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

impl MatchesResponse {
    pub fn new(matches: Vec<TeamMatchRecord>) -> Self {
        let total_results = matches.len();
        Self {
            matches,
            total_results,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualMatchResponse {
    #[serde(rename = "emailA")]
    pub email_a: String,
    #[serde(rename = "emailB")]
    pub email_b: String,
    #[serde(rename = "matchScore")]
    pub match_score: MatchScore,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub profiles: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub email: String,
    pub created: bool,
}
