use crate::models::{DiversityWeights, ParticipantProfile};
use std::collections::BTreeSet;

/// Age range (years) that still counts as fully compatible
const AGE_RANGE_TOLERANCE: f64 = 10.0;

/// Additional years over which age compatibility decays to zero
const AGE_RANGE_DECAY: f64 = 20.0;

/// Number of distinct expertise levels
const EXPERTISE_LEVELS: usize = 4;

/// Breakdown of a team's diversity score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub languages: f64,
    pub age: f64,
    pub overall: f64,
}

/// Weighted diversity of a candidate team
pub fn diversity_score(members: &[&ParticipantProfile], weights: &DiversityWeights) -> DiversityBreakdown {
    let skills = skill_diversity(members);
    let experience = experience_level_diversity(members);
    let education = education_diversity(members);
    let languages = language_diversity(members);
    let age = age_compatibility(members);

    let overall = skills * weights.skills
        + experience * weights.experience
        + education * weights.education
        + languages * weights.languages
        + age * weights.age;

    DiversityBreakdown {
        skills,
        experience,
        education,
        languages,
        age,
        overall: overall.clamp(0.0, 1.0),
    }
}

/// Distinct skills over total skill mentions
pub fn skill_diversity(members: &[&ParticipantProfile]) -> f64 {
    distinct_ratio(members.iter().flat_map(|m| m.skill_set()))
}

/// Distinct expertise levels over the most the team could have
pub fn experience_level_diversity(members: &[&ParticipantProfile]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let levels: BTreeSet<_> = members.iter().map(|m| m.expertise_level).collect();
    levels.len() as f64 / members.len().min(EXPERTISE_LEVELS) as f64
}

/// Distinct education backgrounds per member
pub fn education_diversity(members: &[&ParticipantProfile]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let distinct: BTreeSet<String> = members
        .iter()
        .map(|m| m.education.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();
    distinct.len() as f64 / members.len() as f64
}

/// Distinct languages over total language mentions
pub fn language_diversity(members: &[&ParticipantProfile]) -> f64 {
    distinct_ratio(members.iter().flat_map(|m| m.language_set()))
}

/// 1.0 for an age range within 10 years, decaying linearly to 0 at 30
pub fn age_compatibility(members: &[&ParticipantProfile]) -> f64 {
    let min = members.iter().map(|m| m.age).min();
    let max = members.iter().map(|m| m.age).max();

    match (min, max) {
        (Some(min), Some(max)) => {
            let range = (max - min) as f64;
            if range <= AGE_RANGE_TOLERANCE {
                1.0
            } else {
                (1.0 - (range - AGE_RANGE_TOLERANCE) / AGE_RANGE_DECAY).max(0.0)
            }
        }
        _ => 0.0,
    }
}

fn distinct_ratio(values: impl Iterator<Item = String>) -> f64 {
    let mut total = 0usize;
    let mut distinct = BTreeSet::new();
    for value in values {
        total += 1;
        distinct.insert(value);
    }

    if total == 0 {
        0.0
    } else {
        distinct.len() as f64 / total as f64
    }
}
