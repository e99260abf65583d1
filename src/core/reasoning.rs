use crate::core::scoring::{experience_score, shared_languages};
use crate::models::{ExpertiseLevel, MatchReasoning, MatchScore, ParticipantProfile, WorkStyle};
use std::collections::{BTreeMap, BTreeSet};

pub const ROLE_TEAM_LEAD: &str = "Team Lead";
pub const ROLE_FRONTEND: &str = "Frontend Developer";
pub const ROLE_BACKEND: &str = "Backend Developer";
pub const ROLE_DATA: &str = "Data Scientist";
pub const ROLE_DESIGN: &str = "UI/UX Designer";
pub const ROLE_DEFAULT: &str = "Team Member";

const FRONTEND_KEYWORDS: &[&str] = &[
    "frontend", "front-end", "react", "vue", "angular", "svelte", "javascript", "typescript",
    "html", "css",
];
const BACKEND_KEYWORDS: &[&str] = &[
    "backend", "back-end", "node", "java", "go", "golang", "rust", "django", "flask", "spring",
    "api", "sql", "postgresql", "c#", "php",
];
const DATA_KEYWORDS: &[&str] = &[
    "data", "python", "pandas", "numpy", "ml", "ai", "statistics", "analytics", "tensorflow",
    "pytorch", "machine learning", "data science",
];
const DESIGN_KEYWORDS: &[&str] = &[
    "design", "ui", "ux", "figma", "sketch", "illustrator", "photoshop",
];

/// Role categories, checked in order
const ROLE_CATEGORIES: &[(&str, &[&str])] = &[
    (ROLE_FRONTEND, FRONTEND_KEYWORDS),
    (ROLE_BACKEND, BACKEND_KEYWORDS),
    (ROLE_DATA, DATA_KEYWORDS),
    (ROLE_DESIGN, DESIGN_KEYWORDS),
];

/// Ordinal gap between the least and most experienced member that raises a concern
const EXPERIENCE_GAP_CONCERN: u8 = 3;

/// Explain why a team fits together
///
/// Deterministic: the same members and score always yield the same text.
pub fn generate_reasoning(members: &[&ParticipantProfile], score: &MatchScore) -> MatchReasoning {
    let mut strengths = Vec::new();
    let mut concerns = Vec::new();
    let mut suggestions = Vec::new();

    let unique_skills: BTreeSet<String> = members.iter().flat_map(|m| m.skill_set()).collect();
    if !members.is_empty() && unique_skills.len() >= 2 * members.len() {
        strengths.push(format!(
            "Diverse skill set: {} distinct skills across {} members",
            unique_skills.len(),
            members.len()
        ));
    }

    let levels: BTreeSet<ExpertiseLevel> = members.iter().map(|m| m.expertise_level).collect();
    if levels.len() > 1 {
        let names: Vec<&str> = levels.iter().map(|l| l.as_str()).collect();
        strengths.push(format!("Mix of experience levels ({})", names.join(", ")));
    }

    let languages = shared_languages(members);
    if !languages.is_empty() {
        let names: Vec<&str> = languages.iter().map(String::as_str).collect();
        strengths.push(format!("Shared language(s): {}", names.join(", ")));
    }

    if score.is_high_quality() {
        strengths.push(format!(
            "High overall compatibility ({:.0}%)",
            score.overall * 100.0
        ));
    }

    let gap = level_gap(&levels);
    if gap >= EXPERIENCE_GAP_CONCERN {
        concerns.push(
            "Large experience gap between the most and least experienced members".to_string(),
        );
    }

    if members.len() >= 2 && no_overlapping_skills(members) {
        concerns.push("No overlapping skills between any two members".to_string());
    }

    suggestions.push("Hold a kickoff meeting to agree on goals and working agreements".to_string());
    suggestions.push("Build a skills matrix to decide who owns each part of the project".to_string());
    if gap > 1 {
        suggestions.push(
            "Pair experienced members with newer ones for mentoring during the event".to_string(),
        );
    }

    MatchReasoning {
        strengths,
        concerns,
        suggestions,
    }
}

/// Assign a role label to every member, keyed by e-mail
///
/// At most one member becomes Team Lead: the most experienced leader, or an
/// expert facilitator. Everyone else is labelled from their skill keywords.
pub fn assign_roles(members: &[&ParticipantProfile]) -> BTreeMap<String, String> {
    let lead = pick_team_lead(members);

    members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let role = if Some(i) == lead {
                ROLE_TEAM_LEAD
            } else {
                role_from_skills(member)
            };
            (member.email.clone(), role.to_string())
        })
        .collect()
}

/// First matching skill category, or the default role
pub fn role_from_skills(profile: &ParticipantProfile) -> &'static str {
    let skills = profile.skill_set();

    ROLE_CATEGORIES
        .iter()
        .find(|(_, keywords)| skills.iter().any(|s| matches_keywords(s, keywords)))
        .map(|(role, _)| *role)
        .unwrap_or(ROLE_DEFAULT)
}

fn pick_team_lead(members: &[&ParticipantProfile]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, member) in members.iter().enumerate() {
        let eligible = match member.preferences.work_style {
            WorkStyle::Leader => true,
            WorkStyle::Facilitator => member.expertise_level == ExpertiseLevel::Expert,
            _ => false,
        };
        if !eligible {
            continue;
        }

        let score = experience_score(member);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }

    best.map(|(i, _)| i)
}

fn matches_keywords(skill: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        if keyword.contains(' ') {
            skill.contains(keyword)
        } else {
            skill
                .split(|c: char| !(c.is_alphanumeric() || c == '#' || c == '-'))
                .any(|token| token == *keyword)
        }
    })
}

fn level_gap(levels: &BTreeSet<ExpertiseLevel>) -> u8 {
    match (levels.iter().next(), levels.iter().next_back()) {
        (Some(min), Some(max)) => max.ordinal() - min.ordinal(),
        _ => 0,
    }
}

fn no_overlapping_skills(members: &[&ParticipantProfile]) -> bool {
    let sets: Vec<BTreeSet<String>> = members.iter().map(|m| m.skill_set()).collect();

    sets.iter()
        .enumerate()
        .all(|(i, a)| sets[i + 1..].iter().all(|b| a.is_disjoint(b)))
}
