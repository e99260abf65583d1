use crate::models::{
    CommunicationStyle, ParticipantProfile, MatchScore, ScoringWeights, TeamSizePreference,
};
use std::collections::{BTreeSet, HashMap};

/// Cap on the per-member experience score
pub const MAX_EXPERIENCE_SCORE: f64 = 5.0;

/// Communication fit for a pair without a common language
pub const PAIR_LANGUAGE_FALLBACK: f64 = 0.3;

/// Communication fit for a team without a language shared by everyone
pub const TEAM_LANGUAGE_FALLBACK: f64 = 0.7;

/// Skills a single member is expected to bring when measuring team skill diversity
const SKILLS_PER_MEMBER: f64 = 5.0;

/// Weight of the bonus for skills held by more than one member
const SKILL_COVERAGE_BONUS: f64 = 0.3;

/// Calculate the compatibility of two participants
///
/// Scoring formula:
/// overall = (
///     skills * 0.30 +          # Jaccard overlap of skill sets
///     experience * 0.25 +      # Low variance of experience scores
///     preferences * 0.20 +     # Team size + communication style
///     communication * 0.15 +   # Shared language
///     availability * 0.10      # Neutral constant, no data yet
/// )
pub fn calculate_pairwise_score(
    a: &ParticipantProfile,
    b: &ParticipantProfile,
    weights: &ScoringWeights,
) -> MatchScore {
    let skills = skills_compatibility(a, b);
    let experience = experience_balance(&[experience_score(a), experience_score(b)]);
    let preferences = preferences_alignment(a, b);
    let communication = if shared_languages(&[a, b]).is_empty() {
        PAIR_LANGUAGE_FALLBACK
    } else {
        1.0
    };

    MatchScore::from_components(skills, experience, preferences, communication, None, weights)
}

/// Calculate the aggregate score of a whole team
pub fn calculate_team_score(members: &[&ParticipantProfile], weights: &ScoringWeights) -> MatchScore {
    let skills = team_skills_score(members);
    let scores: Vec<f64> = members.iter().map(|m| experience_score(m)).collect();
    let experience = experience_balance(&scores);
    let preferences = team_preferences_alignment(members);
    let communication = if members.is_empty() || shared_languages(members).is_empty() {
        TEAM_LANGUAGE_FALLBACK
    } else {
        1.0
    };

    MatchScore::from_components(skills, experience, preferences, communication, None, weights)
}

/// Jaccard index over lowercased skill sets (0 when both are empty)
pub fn skills_compatibility(a: &ParticipantProfile, b: &ParticipantProfile) -> f64 {
    let skills_a = a.skill_set();
    let skills_b = b.skill_set();

    let union = skills_a.union(&skills_b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = skills_a.intersection(&skills_b).count();
    intersection as f64 / union as f64
}

/// ordinal(level) + years / 10 + projects / 5, capped at 5
pub fn experience_score(profile: &ParticipantProfile) -> f64 {
    let level = profile.expertise_level.ordinal() as f64;
    let years = profile.total_years_of_experience() / 10.0;
    let projects = profile.projects.len() as f64 / 5.0;

    (level + years + projects).min(MAX_EXPERIENCE_SCORE)
}

/// Population variance; 0 for an empty slice
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// max(0, 1 - variance / 2); fewer than two members have nothing to balance
pub fn experience_balance(scores: &[f64]) -> f64 {
    if scores.len() < 2 {
        return 1.0;
    }

    (1.0 - variance(scores) / 2.0).max(0.0)
}

/// Compatibility of two team size preferences
///
/// `any` or an identical preference is fully compatible; adjacent sizes
/// score 0.5 and small against large scores 0.
pub fn team_size_compatibility(a: TeamSizePreference, b: TeamSizePreference) -> f64 {
    use TeamSizePreference::*;

    match (a, b) {
        (Any, _) | (_, Any) => 1.0,
        (x, y) if x == y => 1.0,
        (Small, Medium) | (Medium, Small) | (Medium, Large) | (Large, Medium) => 0.5,
        _ => 0.0,
    }
}

/// Communication style matrix
///
/// Same style scores 1.0, the complementary pairs direct/analytical and
/// collaborative/supportive score 0.8, anything else gets partial credit.
pub fn communication_style_compatibility(a: CommunicationStyle, b: CommunicationStyle) -> f64 {
    use CommunicationStyle::*;

    match (a, b) {
        (x, y) if x == y => 1.0,
        (Direct, Analytical) | (Analytical, Direct) => 0.8,
        (Collaborative, Supportive) | (Supportive, Collaborative) => 0.8,
        (Collaborative, _) | (_, Collaborative) => 0.5,
        _ => 0.3,
    }
}

/// Average of team size and communication style compatibility for a pair
pub fn preferences_alignment(a: &ParticipantProfile, b: &ParticipantProfile) -> f64 {
    let size = team_size_compatibility(a.preferences.team_size, b.preferences.team_size);
    let style = communication_style_compatibility(
        a.preferences.communication_style,
        b.preferences.communication_style,
    );

    (size + style) / 2.0
}

/// Team form of the preference alignment
///
/// Size part: fraction of members whose preference accepts the actual size.
/// Style part: mean style compatibility over every member pair.
pub fn team_preferences_alignment(members: &[&ParticipantProfile]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let size = members.len();
    let accepted = members
        .iter()
        .filter(|m| m.preferences.team_size.accepts(size))
        .count();
    let size_score = accepted as f64 / size as f64;

    let mut style_total = 0.0;
    let mut comparisons = 0usize;
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            style_total += communication_style_compatibility(
                a.preferences.communication_style,
                b.preferences.communication_style,
            );
            comparisons += 1;
        }
    }
    let style_score = if comparisons == 0 {
        1.0
    } else {
        style_total / comparisons as f64
    };

    (size_score + style_score) / 2.0
}

/// Languages spoken by every member (lowercased)
pub fn shared_languages(members: &[&ParticipantProfile]) -> BTreeSet<String> {
    let mut iter = members.iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };

    iter.fold(first.language_set(), |acc, m| {
        let langs = m.language_set();
        acc.intersection(&langs).cloned().collect()
    })
}

/// Team skill score: unique-skill diversity plus a bonus for shared coverage
///
/// min(1, |union| / (members * 5) + 0.3 * |skills held by 2+ members| / |union|)
pub fn team_skills_score(members: &[&ParticipantProfile]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for member in members {
        for skill in member.skill_set() {
            *counts.entry(skill).or_insert(0) += 1;
        }
    }

    let unique = counts.len();
    if unique == 0 {
        return 0.0;
    }

    let diversity = unique as f64 / (members.len() as f64 * SKILLS_PER_MEMBER);
    let repeated = counts.values().filter(|&&c| c >= 2).count();
    let coverage = SKILL_COVERAGE_BONUS * repeated as f64 / unique as f64;

    (diversity + coverage).min(1.0)
}
