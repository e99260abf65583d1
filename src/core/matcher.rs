use crate::core::{
    builder::{DiverseTeamBuilder, DEFAULT_DIVERSITY_THRESHOLD},
    combinations::{combinations, MAX_COMBINATIONS},
    filters::{matches_category_filters, CandidateFilters},
    reasoning::{assign_roles, generate_reasoning},
    scoring::{calculate_pairwise_score, calculate_team_score},
};
use crate::models::{
    DiversityWeights, MatchScore, ParticipantProfile, ScoringWeights, TeamMatch, TeamSegment,
};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Default number of members per team
pub const DEFAULT_TEAM_SIZE: usize = 4;

/// Default minimum score for candidates and teams
pub const DEFAULT_MIN_MATCH_SCORE: f64 = 0.6;

/// Default cap on returned matches for a participant
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default cap on pool-wide recommendations
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 20;

/// Options for a participant-centred search
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    pub team_size: usize,
    pub min_match_score: f64,
    pub max_results: usize,
    pub filters: CandidateFilters,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            team_size: DEFAULT_TEAM_SIZE,
            min_match_score: DEFAULT_MIN_MATCH_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            filters: CandidateFilters::default(),
        }
    }
}

/// Options for the diverse-team builder
#[derive(Debug, Clone, PartialEq)]
pub struct DiverseTeamOptions {
    pub team_size: usize,
    pub max_teams: Option<usize>,
}

impl Default for DiverseTeamOptions {
    fn default() -> Self {
        Self {
            team_size: DEFAULT_TEAM_SIZE,
            max_teams: None,
        }
    }
}

/// Tunable weights and limits for the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    pub weights: ScoringWeights,
    pub diversity_weights: DiversityWeights,
    pub diversity_threshold: f64,
    pub max_combinations: usize,
    pub recommendation_limit: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            diversity_weights: DiversityWeights::default(),
            diversity_threshold: DEFAULT_DIVERSITY_THRESHOLD,
            max_combinations: MAX_COMBINATIONS,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Category filtering of candidates
/// 2. Pairwise ranking against the target
/// 3. Bounded combination search
/// 4. Team scoring (parallel) and thresholding
/// 5. Reasoning and role annotation
///
/// The engine only reads the profile snapshot it is given; persistence is
/// left to the caller.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatcherConfig,
    workers: Option<Arc<rayon::ThreadPool>>,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            config,
            workers: None,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(MatcherConfig::default())
    }

    /// Score subsets on a dedicated pool of `threads` workers instead of the global pool
    pub fn with_worker_threads(mut self, threads: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("hackmatch-scorer-{}", i))
            .build()?;
        self.workers = Some(Arc::new(pool));
        Ok(self)
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Find teams for the participant identified by `target_email`
    ///
    /// Returns an empty list when the target is not in `profiles`, when
    /// `min_match_score` exceeds 1.0, or when nothing clears the threshold.
    /// The combination cap makes this a heuristic search: the best team in
    /// the pool is not guaranteed to be among the results.
    pub fn find_matches(
        &self,
        target_email: &str,
        profiles: &[ParticipantProfile],
        options: &MatchOptions,
    ) -> Vec<TeamMatch> {
        if options.team_size < 2 || options.min_match_score > 1.0 {
            tracing::debug!(
                "Nothing to search: team_size={}, min_match_score={}",
                options.team_size,
                options.min_match_score
            );
            return Vec::new();
        }

        let Some(target) = profiles.iter().find(|p| p.has_email(target_email)) else {
            tracing::warn!("Target participant {} not found in pool", target_email);
            return Vec::new();
        };
        let target_key = target.key();

        // Stage 1 & 2: filter and rank candidates against the target
        let mut ranked: Vec<(&ParticipantProfile, f64)> = unique_profiles(profiles)
            .into_iter()
            .filter(|p| p.key() != target_key)
            .filter(|p| matches_category_filters(p, &options.filters))
            .filter_map(|p| {
                let score = calculate_pairwise_score(target, p, &self.config.weights).overall;
                (score >= options.min_match_score).then_some((p, score))
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.key().cmp(&b.0.key()))
        });

        let candidates: Vec<&ParticipantProfile> = ranked.into_iter().map(|(p, _)| p).collect();

        tracing::debug!(
            "{} of {} profiles passed candidate ranking for {}",
            candidates.len(),
            profiles.len(),
            target_email
        );

        // Stage 3: bounded search, target first in every team
        let subsets: Vec<Vec<&ParticipantProfile>> =
            combinations(&candidates, options.team_size - 1, self.config.max_combinations)
                .into_iter()
                .map(|subset| {
                    let mut members = Vec::with_capacity(options.team_size);
                    members.push(target);
                    members.extend(subset.into_iter().copied());
                    members
                })
                .collect();

        // Stage 4 & 5
        let scored: Vec<_> = self
            .score_subsets(subsets)
            .into_iter()
            .filter(|(_, score)| score.overall >= options.min_match_score)
            .collect();

        let matches = self.rank_and_annotate(scored, options.max_results);

        tracing::info!(
            "Found {} teams for {} (team size {}, min score {:.2})",
            matches.len(),
            target_email,
            options.team_size,
            options.min_match_score
        );

        matches
    }

    /// Pool-wide team recommendations without a target participant
    pub fn generate_team_recommendations(
        &self,
        profiles: &[ParticipantProfile],
        team_size: usize,
    ) -> Vec<TeamMatch> {
        if team_size < 2 {
            return Vec::new();
        }

        let pool = unique_profiles(profiles);
        let subsets = self.recommendation_subsets(&pool, team_size);

        tracing::debug!(
            "{} distinct subsets drawn from {} profiles",
            subsets.len(),
            pool.len()
        );

        let scored = self.score_subsets(subsets);
        let matches = self.rank_and_annotate(scored, self.config.recommendation_limit);

        tracing::info!(
            "Generated {} team recommendations from {} profiles",
            matches.len(),
            pool.len()
        );

        matches
    }

    /// Demographic-aware diverse teams, in batch order
    /// (female-only, mixed adults, minors-only)
    pub fn find_diverse_teams(
        &self,
        profiles: &[ParticipantProfile],
        options: &DiverseTeamOptions,
    ) -> Vec<TeamMatch> {
        let pool = unique_profiles(profiles);
        let builder = DiverseTeamBuilder::new(
            options.team_size,
            self.config.diversity_threshold,
            self.config.diversity_weights,
        );

        let limit = options.max_teams.unwrap_or(usize::MAX);
        let matches: Vec<TeamMatch> = builder
            .build(&pool)
            .into_iter()
            .take(limit)
            .filter_map(|team| {
                let score = calculate_team_score(&team.members, &self.config.weights);
                annotate(&team.members, score).map(|m| m.with_segment(team.segment))
            })
            .collect();

        let count = |segment: TeamSegment| matches.iter().filter(|m| m.segment == Some(segment)).count();
        tracing::info!(
            "Formed {} diverse teams (female-only: {}, mixed-adults: {}, minors-only: {})",
            matches.len(),
            count(TeamSegment::FemaleOnly),
            count(TeamSegment::MixedAdults),
            count(TeamSegment::MinorsOnly)
        );

        matches
    }

    /// Compatibility of two individual participants
    pub fn calculate_individual_match(
        &self,
        a: &ParticipantProfile,
        b: &ParticipantProfile,
    ) -> MatchScore {
        calculate_pairwise_score(a, b, &self.config.weights)
    }

    /// Run `work` on the dedicated pool when one is configured
    fn install<R: Send>(&self, work: impl FnOnce() -> R + Send) -> R {
        match &self.workers {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }

    /// Bounded subset search for pool-wide recommendations
    ///
    /// Every profile is ranked by its mean pairwise score against the rest of
    /// the pool. Each profile, in rank order, then anchors a share of the
    /// combination budget drawn from its own best partners, so no single
    /// leading group of the pool occupies every subset. Member sets are
    /// emitted at most once and never exceed `max_combinations` in total.
    fn recommendation_subsets<'a>(
        &self,
        pool: &[&'a ParticipantProfile],
        team_size: usize,
    ) -> Vec<Vec<&'a ParticipantProfile>> {
        let n = pool.len();
        let budget = self.config.max_combinations;
        if n < team_size || budget == 0 {
            return Vec::new();
        }

        let weights = self.config.weights;
        let pairwise: Vec<Vec<f64>> = self.install(|| {
            pool.par_iter()
                .map(|a| {
                    pool.iter()
                        .map(|b| calculate_pairwise_score(a, b, &weights).overall)
                        .collect()
                })
                .collect()
        });

        let by_score_then_key = |scores: &[f64], i: usize, j: usize| {
            scores[j]
                .partial_cmp(&scores[i])
                .unwrap_or(Ordering::Equal)
                .then_with(|| pool[i].key().cmp(&pool[j].key()))
        };

        let affinity: Vec<f64> = pairwise
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let others: f64 = row
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, score)| score)
                    .sum();
                others / (n - 1).max(1) as f64
            })
            .collect();
        let mut anchors: Vec<usize> = (0..n).collect();
        anchors.sort_by(|&i, &j| by_score_then_key(&affinity[..], i, j));

        let per_anchor = (budget / n).max(1);
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut subsets = Vec::new();

        'anchors: for &anchor in &anchors {
            let mut partners: Vec<usize> = (0..n).filter(|&j| j != anchor).collect();
            partners.sort_by(|&i, &j| by_score_then_key(&pairwise[anchor][..], i, j));

            for chosen in combinations(&partners, team_size - 1, per_anchor) {
                let mut members: Vec<usize> = Vec::with_capacity(team_size);
                members.push(anchor);
                members.extend(chosen.into_iter().copied());

                let mut signature = members.clone();
                signature.sort_unstable();
                if !seen.insert(signature) {
                    continue;
                }

                subsets.push(members.into_iter().map(|i| pool[i]).collect());
                if subsets.len() >= budget {
                    break 'anchors;
                }
            }
        }

        subsets
    }

    /// Score every subset as a team on the worker pool
    fn score_subsets<'a>(
        &self,
        subsets: Vec<Vec<&'a ParticipantProfile>>,
    ) -> Vec<(Vec<&'a ParticipantProfile>, MatchScore)> {
        let weights = self.config.weights;
        let work = move || -> Vec<(Vec<&'a ParticipantProfile>, MatchScore)> {
            subsets
                .into_par_iter()
                .map(|members| {
                    let score = calculate_team_score(&members, &weights);
                    (members, score)
                })
                .collect()
        };

        self.install(work)
    }

    /// Sort by overall score descending, keep `limit`, then annotate
    fn rank_and_annotate(
        &self,
        mut scored: Vec<(Vec<&ParticipantProfile>, MatchScore)>,
        limit: usize,
    ) -> Vec<TeamMatch> {
        scored.sort_by(|a, b| {
            b.1.overall
                .partial_cmp(&a.1.overall)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(limit);

        scored
            .into_iter()
            .filter_map(|(members, score)| annotate(&members, score))
            .collect()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Build a suggested `TeamMatch` with reasoning and roles
fn annotate(members: &[&ParticipantProfile], score: MatchScore) -> Option<TeamMatch> {
    let emails = members.iter().map(|m| m.email.clone()).collect();
    let reasoning = generate_reasoning(members, &score);
    let roles = assign_roles(members);

    match TeamMatch::new(emails, score, reasoning, roles) {
        Ok(team) => Some(team),
        Err(e) => {
            tracing::warn!("Skipping invalid team: {}", e);
            None
        }
    }
}

/// Profiles with duplicate e-mails removed, first occurrence wins
fn unique_profiles(profiles: &[ParticipantProfile]) -> Vec<&ParticipantProfile> {
    let mut seen = HashSet::new();
    profiles.iter().filter(|p| seen.insert(p.key())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    fn create_candidate(
        id: usize,
        skills: &[&str],
        level: &str,
        age: u8,
        gender: Option<&str>,
    ) -> ParticipantProfile {
        serde_json::from_value(serde_json::json!({
            "email": format!("user{}@hack.io", id),
            "fullName": format!("User {}", id),
            "skills": skills,
            "expertiseLevel": level,
            "education": format!("Uni {}", id % 3),
            "age": age,
            "gender": gender,
            "preferences": { "teamSize": "any", "communicationStyle": "collaborative" },
            "languages": ["English"],
        }))
        .unwrap()
    }

    fn create_pool(n: usize) -> Vec<ParticipantProfile> {
        let skills = [
            ["python", "sql"],
            ["python", "pandas"],
            ["react", "css"],
            ["rust", "sql"],
            ["figma", "python"],
        ];
        let levels = ["beginner", "intermediate", "advanced", "expert"];
        (0..n)
            .map(|i| create_candidate(i, &skills[i % 5], levels[i % 4], 20 + (i % 8) as u8, None))
            .collect()
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(8);
        let options = MatchOptions {
            team_size: 3,
            min_match_score: 0.3,
            ..Default::default()
        };

        let matches = matcher.find_matches("USER0@hack.io", &pool, &options);

        assert!(!matches.is_empty());
        assert!(matches.len() <= options.max_results);
        for m in &matches {
            assert_eq!(m.participant_emails[0], "user0@hack.io");
            assert_eq!(m.team_size(), 3);
            assert_eq!(m.status, MatchStatus::Suggested);
            assert!(m.match_score.overall >= 0.3);
            assert_eq!(m.recommended_roles.len(), 3);
        }
    }

    #[test]
    fn test_matches_sorted_by_score() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(10);
        let options = MatchOptions {
            team_size: 3,
            min_match_score: 0.0,
            max_results: 50,
            ..Default::default()
        };

        let matches = matcher.find_matches("user1@hack.io", &pool, &options);
        for pair in matches.windows(2) {
            assert!(pair[0].match_score.overall >= pair[1].match_score.overall);
        }
    }

    #[test]
    fn test_unknown_target_returns_empty() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(5);

        let matches = matcher.find_matches("ghost@hack.io", &pool, &MatchOptions::default());
        assert!(matches.is_empty());
    }

    #[test]
    fn test_min_score_above_one_returns_empty() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(6);
        let options = MatchOptions {
            min_match_score: 1.01,
            ..Default::default()
        };

        assert!(matcher.find_matches("user0@hack.io", &pool, &options).is_empty());
    }

    #[test]
    fn test_respects_limit() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(20);
        let options = MatchOptions {
            team_size: 3,
            min_match_score: 0.0,
            max_results: 5,
            ..Default::default()
        };

        assert_eq!(matcher.find_matches("user0@hack.io", &pool, &options).len(), 5);
    }

    #[test]
    fn test_category_filters_apply_to_candidates() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(10);
        let options = MatchOptions {
            team_size: 2,
            min_match_score: 0.0,
            max_results: 50,
            filters: CandidateFilters {
                required_skills: vec!["React".to_string()],
                ..Default::default()
            },
        };

        let matches = matcher.find_matches("user0@hack.io", &pool, &options);
        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert!(["user2@hack.io", "user7@hack.io"].contains(&m.participant_emails[1].as_str()));
        }
    }

    #[test]
    fn test_recommendations_capped() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(12);

        let teams = matcher.generate_team_recommendations(&pool, 3);
        assert_eq!(teams.len(), DEFAULT_RECOMMENDATION_LIMIT);
        assert!(matcher.generate_team_recommendations(&pool, 1).is_empty());
    }

    #[test]
    fn test_recommendations_spread_across_pool() {
        let matcher = Matcher::with_default_weights();
        let skill_groups = [
            "python", "react", "rust", "figma", "sql", "docker", "swift", "kotlin", "go",
            "unity", "solidity", "pandas", "vue", "haskell", "elixir",
        ];
        // 15 groups of 4 with identical skills inside a group, disjoint across groups
        let pool: Vec<ParticipantProfile> = (0..60)
            .map(|i| create_candidate(i, &[skill_groups[i % 15]], "intermediate", 25, None))
            .collect();

        let teams = matcher.generate_team_recommendations(&pool, 4);
        assert_eq!(teams.len(), 15);

        let mut seen = HashSet::new();
        for team in &teams {
            for email in &team.participant_emails {
                assert!(seen.insert(email.clone()), "{} recommended twice", email);
            }
        }
        assert_eq!(seen.len(), 60);
    }

    #[test]
    fn test_recommendation_subsets_bounded_and_distinct() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(10);
        let refs: Vec<&ParticipantProfile> = pool.iter().collect();

        let subsets = matcher.recommendation_subsets(&refs, 4);
        assert!(!subsets.is_empty());
        assert!(subsets.len() <= MAX_COMBINATIONS);

        let mut signatures = HashSet::new();
        for subset in &subsets {
            let mut keys: Vec<String> = subset.iter().map(|p| p.key()).collect();
            keys.sort();
            keys.dedup();
            assert_eq!(keys.len(), 4);
            assert!(signatures.insert(keys));
        }

        assert!(matcher.recommendation_subsets(&refs[..3], 4).is_empty());
    }

    #[test]
    fn test_dedicated_worker_pool() {
        let matcher = Matcher::with_default_weights()
            .with_worker_threads(2)
            .unwrap();
        let pool = create_pool(8);

        let teams = matcher.generate_team_recommendations(&pool, 2);
        assert!(!teams.is_empty());
    }

    #[test]
    fn test_duplicate_profiles_are_ignored() {
        let matcher = Matcher::with_default_weights();
        let mut pool = create_pool(3);
        pool.push(pool[1].clone());

        let teams = matcher.generate_team_recommendations(&pool, 2);
        // C(3, 2) distinct pairs only
        assert_eq!(teams.len(), 3);
    }

    #[test]
    fn test_diverse_teams_respect_max_teams() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(16);
        let options = DiverseTeamOptions {
            team_size: 4,
            max_teams: Some(1),
        };

        let teams = matcher.find_diverse_teams(&pool, &options);
        assert!(teams.len() <= 1);
        for team in &teams {
            assert!(team.segment.is_some());
        }
    }

    #[test]
    fn test_individual_match_symmetric_skills() {
        let matcher = Matcher::with_default_weights();
        let pool = create_pool(2);

        let ab = matcher.calculate_individual_match(&pool[0], &pool[1]);
        let ba = matcher.calculate_individual_match(&pool[1], &pool[0]);
        assert_eq!(ab.skills_compatibility, ba.skills_compatibility);
        assert_eq!(ab.overall, ba.overall);
    }
}
