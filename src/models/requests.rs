use crate::models::domain::ExpertiseLevel;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to find teams for a participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 2, max = 12))]
    #[serde(rename = "teamSize", default)]
    pub team_size: Option<usize>,
    #[validate(range(min = 0.0))]
    #[serde(rename = "minMatchScore", default)]
    pub min_match_score: Option<f64>,
    #[validate(range(min = 1, max = 100))]
    #[serde(rename = "maxResults", default)]
    pub max_results: Option<usize>,
    #[serde(rename = "requiredSkills", default)]
    pub required_skills: Vec<String>,
    #[serde(rename = "expertiseLevels", default)]
    pub expertise_levels: Vec<ExpertiseLevel>,
    #[serde(rename = "excludeEmails", default)]
    pub exclude_emails: Vec<String>,
}

/// Request for pool-wide team recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationsRequest {
    #[validate(range(min = 2, max = 12))]
    #[serde(rename = "teamSize", default)]
    pub team_size: Option<usize>,
}

/// Request for demographic-aware diverse teams
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiverseTeamsRequest {
    #[validate(range(min = 2, max = 12))]
    #[serde(rename = "teamSize", default)]
    pub team_size: Option<usize>,
    #[validate(range(min = 1))]
    #[serde(rename = "maxTeams", default)]
    pub max_teams: Option<usize>,
}

/// Request to score two participants against each other
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IndividualMatchRequest {
    #[validate(email)]
    #[serde(rename = "emailA")]
    pub email_a: String,
    #[validate(email)]
    #[serde(rename = "emailB")]
    pub email_b: String,
}

/// Accept/reject request; the requester must be a participant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatusUpdateRequest {
    #[validate(email)]
    pub email: String,
}
