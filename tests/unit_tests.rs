// Unit tests for HackMatch

use hackmatch::core::{
    combinations::{binomial, combinations},
    diversity::{age_compatibility, diversity_score},
    filters::{matches_category_filters, CandidateFilters},
    reasoning::{assign_roles, ROLE_DEFAULT, ROLE_TEAM_LEAD},
    scoring::{
        calculate_pairwise_score, calculate_team_score, communication_style_compatibility,
        experience_balance, experience_score, skills_compatibility,
    },
};
use hackmatch::models::{
    CommunicationStyle, DiversityWeights, ExpertiseLevel, ParticipantPreferences,
    ParticipantProfile, Project, ScoringWeights, WorkStyle,
};

fn create_test_profile(email: &str, skills: &[&str], level: ExpertiseLevel, age: u8) -> ParticipantProfile {
    ParticipantProfile {
        email: email.to_string(),
        full_name: format!("Participant {}", email),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        expertise_level: level,
        work_experience: vec![],
        education: "Computer Science".to_string(),
        age,
        gender: None,
        prefer_female_team: None,
        projects: vec![],
        preferences: ParticipantPreferences::default(),
        languages: vec!["English".to_string()],
    }
}

#[test]
fn test_skills_jaccard_example() {
    let a = create_test_profile("a@x.io", &["Python", "SQL"], ExpertiseLevel::Beginner, 22);
    let b = create_test_profile("b@x.io", &["python", "Excel"], ExpertiseLevel::Beginner, 22);

    assert!((skills_compatibility(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_skills_both_empty() {
    let a = create_test_profile("a@x.io", &[], ExpertiseLevel::Beginner, 22);
    let b = create_test_profile("b@x.io", &[], ExpertiseLevel::Beginner, 22);

    assert_eq!(skills_compatibility(&a, &b), 0.0);
}

#[test]
fn test_experience_balance_example() {
    // ordinals 1, 2, 4 with no history
    let members = [
        create_test_profile("a@x.io", &[], ExpertiseLevel::Beginner, 22),
        create_test_profile("b@x.io", &[], ExpertiseLevel::Intermediate, 22),
        create_test_profile("c@x.io", &[], ExpertiseLevel::Expert, 22),
    ];
    let scores: Vec<f64> = members.iter().map(experience_score).collect();
    assert_eq!(scores, vec![1.0, 2.0, 4.0]);
    assert!((experience_balance(&scores) - 0.2222).abs() < 1e-3);
}

#[test]
fn test_experience_score_is_capped() {
    let mut p = create_test_profile("a@x.io", &[], ExpertiseLevel::Expert, 40);
    p.projects = (0..20)
        .map(|i| Project {
            name: format!("project {}", i),
            description: None,
            technologies: vec![],
        })
        .collect();

    assert_eq!(experience_score(&p), 5.0);
}

#[test]
fn test_pairwise_score_symmetric_and_bounded() {
    let mut a = create_test_profile("a@x.io", &["rust", "go"], ExpertiseLevel::Advanced, 25);
    a.preferences.communication_style = CommunicationStyle::Direct;
    a.preferences.work_style = WorkStyle::Leader;
    let mut b = create_test_profile("b@x.io", &["rust", "react"], ExpertiseLevel::Beginner, 19);
    b.preferences.communication_style = CommunicationStyle::Analytical;
    b.languages = vec!["Spanish".to_string()];

    let weights = ScoringWeights::default();
    let ab = calculate_pairwise_score(&a, &b, &weights);
    let ba = calculate_pairwise_score(&b, &a, &weights);

    assert_eq!(ab, ba);
    for value in [
        ab.overall,
        ab.skills_compatibility,
        ab.experience_balance,
        ab.preferences_alignment,
        ab.communication_fit,
        ab.availability_match,
    ] {
        assert!((0.0..=1.0).contains(&value), "{} out of range", value);
    }
}

#[test]
fn test_communication_table() {
    use CommunicationStyle::*;

    assert_eq!(communication_style_compatibility(Direct, Direct), 1.0);
    assert_eq!(communication_style_compatibility(Direct, Analytical), 0.8);
    assert_eq!(communication_style_compatibility(Supportive, Collaborative), 0.8);
    assert_eq!(communication_style_compatibility(Collaborative, Direct), 0.5);
    assert_eq!(communication_style_compatibility(Direct, Supportive), 0.3);
}

#[test]
fn test_team_score_bounded() {
    let members = [
        create_test_profile("a@x.io", &["python"], ExpertiseLevel::Beginner, 17),
        create_test_profile("b@x.io", &["figma"], ExpertiseLevel::Expert, 45),
        create_test_profile("c@x.io", &["rust", "python"], ExpertiseLevel::Advanced, 30),
    ];
    let refs: Vec<&ParticipantProfile> = members.iter().collect();

    let score = calculate_team_score(&refs, &ScoringWeights::default());
    assert!(score.overall >= 0.0 && score.overall <= 1.0);
    assert!(score.availability_match > 0.0);
}

#[test]
fn test_category_filters() {
    let p = create_test_profile("Dev@X.io", &["Rust"], ExpertiseLevel::Advanced, 28);

    assert!(matches_category_filters(&p, &CandidateFilters::default()));

    let excluded = CandidateFilters {
        exclude_emails: vec!["dev@x.io".to_string()],
        ..Default::default()
    };
    assert!(!matches_category_filters(&p, &excluded));

    let wrong_level = CandidateFilters {
        expertise_levels: vec![ExpertiseLevel::Beginner],
        ..Default::default()
    };
    assert!(!matches_category_filters(&p, &wrong_level));

    let skills = CandidateFilters {
        required_skills: vec!["rust".to_string(), "go".to_string()],
        ..Default::default()
    };
    assert!(matches_category_filters(&p, &skills));
}

#[test]
fn test_combination_cap() {
    let pool: Vec<usize> = (0..10).collect();

    assert_eq!(binomial(10, 3), 120);
    assert_eq!(combinations(&pool, 3, 100).len(), 100);
    assert_eq!(combinations(&pool[..5], 3, 100).len(), 10);
    assert!(combinations(&pool[..2], 3, 100).is_empty());
}

#[test]
fn test_diversity_bounded_and_age_rule() {
    let young = create_test_profile("a@x.io", &["python"], ExpertiseLevel::Beginner, 20);
    let close = create_test_profile("b@x.io", &["react"], ExpertiseLevel::Expert, 29);
    let far = create_test_profile("c@x.io", &["figma"], ExpertiseLevel::Advanced, 60);

    assert_eq!(age_compatibility(&[&young, &close]), 1.0);
    assert!(age_compatibility(&[&young, &far]) < 1.0);

    let breakdown = diversity_score(&[&young, &close, &far], &DiversityWeights::default());
    assert!(breakdown.overall >= 0.0 && breakdown.overall <= 1.0);
}

#[test]
fn test_roles_have_single_lead() {
    let mut lead = create_test_profile("lead@x.io", &["python"], ExpertiseLevel::Expert, 35);
    lead.preferences.work_style = WorkStyle::Leader;
    let member = create_test_profile("m@x.io", &["knitting"], ExpertiseLevel::Beginner, 20);

    let roles = assign_roles(&[&lead, &member]);
    assert_eq!(roles.len(), 2);
    assert_eq!(roles["lead@x.io"], ROLE_TEAM_LEAD);
    assert_eq!(roles["m@x.io"], ROLE_DEFAULT);
    assert_eq!(roles.values().filter(|r| r.as_str() == ROLE_TEAM_LEAD).count(), 1);
}
