use crate::models::domain::{normalize_email, ScoringWeights};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Availability score used when no availability data exists
pub const NEUTRAL_AVAILABILITY: f64 = 0.8;

/// Overall score at or above which a team is flagged high quality
pub const HIGH_QUALITY_THRESHOLD: f64 = 0.75;

/// Overall score at or above which a team is considered viable
pub const VIABLE_THRESHOLD: f64 = 0.6;

/// Minimum availability for a viable team
pub const VIABLE_AVAILABILITY: f64 = 0.5;

fn default_availability() -> f64 {
    NEUTRAL_AVAILABILITY
}

/// Score breakdown for a pair or team; every field lies in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub overall: f64,
    #[serde(rename = "skillsCompatibility")]
    pub skills_compatibility: f64,
    #[serde(rename = "experienceBalance")]
    pub experience_balance: f64,
    #[serde(rename = "preferencesAlignment")]
    pub preferences_alignment: f64,
    #[serde(rename = "communicationFit")]
    pub communication_fit: f64,
    #[serde(rename = "availabilityMatch", default = "default_availability")]
    pub availability_match: f64,
}

impl MatchScore {
    /// Build a score from its components; `overall` is the weighted sum, clamped
    pub fn from_components(
        skills: f64,
        experience: f64,
        preferences: f64,
        communication: f64,
        availability: Option<f64>,
        weights: &ScoringWeights,
    ) -> Self {
        let skills = unit(skills);
        let experience = unit(experience);
        let preferences = unit(preferences);
        let communication = unit(communication);
        let availability = unit(availability.unwrap_or(NEUTRAL_AVAILABILITY));

        let overall = skills * weights.skills
            + experience * weights.experience
            + preferences * weights.preferences
            + communication * weights.communication
            + availability * weights.availability;

        Self {
            overall: unit(overall),
            skills_compatibility: skills,
            experience_balance: experience,
            preferences_alignment: preferences,
            communication_fit: communication,
            availability_match: availability,
        }
    }

    pub fn is_high_quality(&self) -> bool {
        self.overall >= HIGH_QUALITY_THRESHOLD
    }

    pub fn is_viable(&self) -> bool {
        self.overall >= VIABLE_THRESHOLD && self.availability_match >= VIABLE_AVAILABILITY
    }
}

/// Clamp into [0, 1], mapping NaN to 0
pub(crate) fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReasoning {
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Suggested,
    Accepted,
    Rejected,
    Expired,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchStatus::Suggested)
    }

    /// suggested -> {accepted, rejected, expired}; every other state is final
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        matches!(
            (self, next),
            (MatchStatus::Suggested, MatchStatus::Accepted)
                | (MatchStatus::Suggested, MatchStatus::Rejected)
                | (MatchStatus::Suggested, MatchStatus::Expired)
        )
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchStatus::Suggested => "suggested",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
            MatchStatus::Expired => "expired",
        };
        write!(f, "{}", s)
    }
}

/// Demographic batch a diverse team was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamSegment {
    FemaleOnly,
    MixedAdults,
    MinorsOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchStateError {
    #[error("a team needs at least 2 participants, got {0}")]
    TooFewParticipants(usize),

    #[error("participant listed twice: {0}")]
    DuplicateParticipant(String),

    #[error("{0} is not a participant of this match")]
    NotAParticipant(String),

    #[error("cannot move match from {from} to {to}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },
}

/// A suggested team with its score, reasoning and roles
///
/// Values are immutable: status changes produce a new `TeamMatch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatch {
    pub id: String,
    #[serde(rename = "participantEmails")]
    pub participant_emails: Vec<String>,
    #[serde(rename = "matchScore")]
    pub match_score: MatchScore,
    pub reasoning: MatchReasoning,
    #[serde(rename = "recommendedRoles")]
    pub recommended_roles: BTreeMap<String, String>,
    pub status: MatchStatus,
    #[serde(default)]
    pub segment: Option<TeamSegment>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl TeamMatch {
    pub fn new(
        participant_emails: Vec<String>,
        match_score: MatchScore,
        reasoning: MatchReasoning,
        recommended_roles: BTreeMap<String, String>,
    ) -> Result<Self, MatchStateError> {
        if participant_emails.len() < 2 {
            return Err(MatchStateError::TooFewParticipants(participant_emails.len()));
        }

        let mut seen = HashSet::new();
        for email in &participant_emails {
            if !seen.insert(normalize_email(email)) {
                return Err(MatchStateError::DuplicateParticipant(email.clone()));
            }
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            participant_emails,
            match_score,
            reasoning,
            recommended_roles,
            status: MatchStatus::Suggested,
            segment: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_segment(mut self, segment: TeamSegment) -> Self {
        self.segment = Some(segment);
        self
    }

    pub fn team_size(&self) -> usize {
        self.participant_emails.len()
    }

    pub fn has_participant(&self, email: &str) -> bool {
        let email = normalize_email(email);
        self.participant_emails
            .iter()
            .any(|p| normalize_email(p) == email)
    }

    pub fn accept(&self, requester: &str) -> Result<Self, MatchStateError> {
        self.transition_by(requester, MatchStatus::Accepted)
    }

    pub fn reject(&self, requester: &str) -> Result<Self, MatchStateError> {
        self.transition_by(requester, MatchStatus::Rejected)
    }

    /// System-initiated expiry; no requester check
    pub fn expire(&self) -> Result<Self, MatchStateError> {
        self.transition(MatchStatus::Expired)
    }

    /// Transition requested by a participant of the match
    pub fn transition_by(
        &self,
        requester: &str,
        next: MatchStatus,
    ) -> Result<Self, MatchStateError> {
        if !self.has_participant(requester) {
            return Err(MatchStateError::NotAParticipant(requester.to_string()));
        }
        self.transition(next)
    }

    fn transition(&self, next: MatchStatus) -> Result<Self, MatchStateError> {
        if !self.status.can_transition_to(next) {
            return Err(MatchStateError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        Ok(Self {
            status: next,
            ..self.clone()
        })
    }

    /// Flat presentation record with derived metadata
    pub fn to_record(&self) -> TeamMatchRecord {
        TeamMatchRecord {
            id: self.id.clone(),
            participant_emails: self.participant_emails.clone(),
            match_score: self.match_score,
            reasoning: self.reasoning.clone(),
            recommended_roles: self.recommended_roles.clone(),
            status: self.status,
            segment: self.segment,
            created_at: self.created_at,
            metadata: MatchMetadata {
                team_size: self.team_size(),
                is_high_quality: self.match_score.is_high_quality(),
                is_viable: self.match_score.is_viable(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    #[serde(rename = "teamSize")]
    pub team_size: usize,
    #[serde(rename = "isHighQuality")]
    pub is_high_quality: bool,
    #[serde(rename = "isViable")]
    pub is_viable: bool,
}

/// Serialized shape of a `TeamMatch` handed to presentation code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchRecord {
    pub id: String,
    #[serde(rename = "participantEmails")]
    pub participant_emails: Vec<String>,
    #[serde(rename = "matchScore")]
    pub match_score: MatchScore,
    pub reasoning: MatchReasoning,
    #[serde(rename = "recommendedRoles")]
    pub recommended_roles: BTreeMap<String, String>,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub segment: Option<TeamSegment>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub metadata: MatchMetadata,
}
