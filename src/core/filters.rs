use crate::models::{normalize_email, ExpertiseLevel, ParticipantProfile};
use std::collections::BTreeSet;

/// Category filters applied to candidates before ranking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilters {
    /// Candidate must list at least one of these skills
    pub required_skills: Vec<String>,
    /// Candidate's expertise must be one of these levels
    pub expertise_levels: Vec<ExpertiseLevel>,
    pub exclude_emails: Vec<String>,
}

impl CandidateFilters {
    pub fn is_empty(&self) -> bool {
        self.required_skills.is_empty()
            && self.expertise_levels.is_empty()
            && self.exclude_emails.is_empty()
    }
}

/// Check if a candidate passes the category filters
#[inline]
pub fn matches_category_filters(profile: &ParticipantProfile, filters: &CandidateFilters) -> bool {
    // Check excluded participants
    if filters
        .exclude_emails
        .iter()
        .any(|e| normalize_email(e) == profile.key())
    {
        return false;
    }

    // Check expertise level
    if !filters.expertise_levels.is_empty()
        && !filters.expertise_levels.contains(&profile.expertise_level)
    {
        return false;
    }

    // Check skills
    if !filters.required_skills.is_empty() {
        let wanted: BTreeSet<String> = filters
            .required_skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();
        if profile.skill_set().is_disjoint(&wanted) {
            return false;
        }
    }

    true
}
