use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Participant age below which a profile is treated as a minor
pub const ADULT_AGE: u8 = 18;

/// Self-reported expertise, ordered from least to most experienced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ExpertiseLevel {
    /// Ordinal used by the scorer (beginner = 1 .. expert = 4)
    pub fn ordinal(self) -> u8 {
        match self {
            ExpertiseLevel::Beginner => 1,
            ExpertiseLevel::Intermediate => 2,
            ExpertiseLevel::Advanced => 3,
            ExpertiseLevel::Expert => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExpertiseLevel::Beginner => "beginner",
            ExpertiseLevel::Intermediate => "intermediate",
            ExpertiseLevel::Advanced => "advanced",
            ExpertiseLevel::Expert => "expert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    #[serde(alias = "female")]
    Feminine,
    #[serde(alias = "male")]
    Masculine,
    NonBinary,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSizePreference {
    Small,
    Medium,
    Large,
    #[default]
    Any,
}

impl TeamSizePreference {
    /// Whether a team of `size` members satisfies this preference
    pub fn accepts(self, size: usize) -> bool {
        match self {
            TeamSizePreference::Any => true,
            TeamSizePreference::Small => size <= 3,
            TeamSizePreference::Medium => (3..=5).contains(&size),
            TeamSizePreference::Large => size >= 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommunicationStyle {
    Direct,
    #[default]
    Collaborative,
    Supportive,
    Analytical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStyle {
    Leader,
    #[default]
    Contributor,
    Specialist,
    Facilitator,
}

/// One entry of a participant's work history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub sector: String,
    #[serde(rename = "yearsOfExperience", default)]
    pub years_of_experience: f64,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantPreferences {
    #[serde(rename = "teamSize", default)]
    pub team_size: TeamSizePreference,
    #[serde(rename = "communicationStyle", default)]
    pub communication_style: CommunicationStyle,
    #[serde(rename = "workStyle", default)]
    pub work_style: WorkStyle,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Self-reported hackathon participant profile
///
/// The e-mail address is the identity key and compares case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "expertiseLevel", default)]
    pub expertise_level: ExpertiseLevel,
    #[serde(rename = "workExperience", default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: String,
    pub age: u8,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(rename = "preferFemaleTeam", default)]
    pub prefer_female_team: Option<bool>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub preferences: ParticipantPreferences,
    #[serde(default)]
    pub languages: Vec<String>,
}

impl ParticipantProfile {
    /// Lowercased, trimmed e-mail used as the identity key
    pub fn key(&self) -> String {
        normalize_email(&self.email)
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.key() == normalize_email(email)
    }

    /// Skills lowercased for case-insensitive comparison
    pub fn skill_set(&self) -> BTreeSet<String> {
        normalized_set(&self.skills)
    }

    pub fn language_set(&self) -> BTreeSet<String> {
        normalized_set(&self.languages)
    }

    pub fn total_years_of_experience(&self) -> f64 {
        self.work_experience
            .iter()
            .map(|w| w.years_of_experience.max(0.0))
            .sum()
    }

    pub fn is_minor(&self) -> bool {
        self.age < ADULT_AGE
    }

    /// Feminine participants who opted in to (or did not opt out of) female-only teams
    pub fn wants_female_team(&self) -> bool {
        self.gender == Some(Gender::Feminine) && self.prefer_female_team.unwrap_or(true)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn normalized_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Component weights for the compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub skills: f64,
    pub experience: f64,
    pub preferences: f64,
    pub communication: f64,
    pub availability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 0.30,
            experience: 0.25,
            preferences: 0.20,
            communication: 0.15,
            availability: 0.10,
        }
    }
}

/// Component weights for the team diversity score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub languages: f64,
    pub age: f64,
}

impl Default for DiversityWeights {
    fn default() -> Self {
        Self {
            skills: 0.40,
            experience: 0.25,
            education: 0.15,
            languages: 0.10,
            age: 0.10,
        }
    }
}
