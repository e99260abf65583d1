use crate::core::diversity::{diversity_score, DiversityBreakdown};
use crate::models::{DiversityWeights, ParticipantProfile, TeamSegment};
use std::collections::{BTreeMap, HashSet};

/// Default minimum diversity score for a formed team
pub const DEFAULT_DIVERSITY_THRESHOLD: f64 = 0.6;

/// Number of leading skills used to group similar profiles
const SIGNATURE_SKILLS: usize = 3;

/// A team produced by the diverse-team builder
#[derive(Debug, Clone)]
pub struct FormedTeam<'a> {
    pub segment: TeamSegment,
    pub members: Vec<&'a ParticipantProfile>,
    pub diversity: DiversityBreakdown,
}

/// Demographic-aware team builder
///
/// # Batches
/// 1. Female-only teams for feminine adults who opted in (or left it unset)
/// 2. Mixed adult teams from the remaining adults
/// 3. Minors-only teams
///
/// Minors and adults never share a team. Only members placed into a
/// female-only team leave the adult pool; opted-in members left over after
/// slicing, or dropped with a window under the diversity threshold, are
/// considered again for mixed adult teams.
#[derive(Debug, Clone)]
pub struct DiverseTeamBuilder {
    team_size: usize,
    threshold: f64,
    weights: DiversityWeights,
}

impl DiverseTeamBuilder {
    pub fn new(team_size: usize, threshold: f64, weights: DiversityWeights) -> Self {
        Self {
            team_size,
            threshold,
            weights,
        }
    }

    pub fn build<'a>(&self, profiles: &[&'a ParticipantProfile]) -> Vec<FormedTeam<'a>> {
        if self.team_size < 2 {
            return Vec::new();
        }

        let (minors, adults): (Vec<&ParticipantProfile>, Vec<&ParticipantProfile>) =
            profiles.iter().copied().partition(|p| p.is_minor());

        let mut teams = Vec::new();

        // Female-priority pool goes first; only placed members leave the adult pool
        let female_pool: Vec<&ParticipantProfile> =
            adults.iter().copied().filter(|p| p.wants_female_team()).collect();
        let mut placed: HashSet<String> = HashSet::new();
        if female_pool.len() >= self.team_size {
            for team in self.form_batch(&female_pool, TeamSegment::FemaleOnly) {
                placed.extend(team.members.iter().map(|m| m.key()));
                teams.push(team);
            }
        }

        let remaining: Vec<&ParticipantProfile> = adults
            .into_iter()
            .filter(|p| !placed.contains(&p.key()))
            .collect();
        teams.extend(self.form_batch(&remaining, TeamSegment::MixedAdults));

        teams.extend(self.form_batch(&minors, TeamSegment::MinorsOnly));

        tracing::debug!(
            "Diverse builder formed {} teams of {} from {} profiles",
            teams.len(),
            self.team_size,
            profiles.len()
        );

        teams
    }

    /// Interleave, slice into windows and keep the diverse-enough ones
    fn form_batch<'a>(
        &self,
        pool: &[&'a ParticipantProfile],
        segment: TeamSegment,
    ) -> Vec<FormedTeam<'a>> {
        if pool.len() < self.team_size {
            return Vec::new();
        }

        let ordered = interleave_by_signature(pool);
        ordered
            .chunks_exact(self.team_size)
            .filter_map(|window| {
                let diversity = diversity_score(window, &self.weights);
                if diversity.overall >= self.threshold {
                    Some(FormedTeam {
                        segment,
                        members: window.to_vec(),
                        diversity,
                    })
                } else {
                    tracing::trace!(
                        "Dropped {:?} window with diversity {:.3}",
                        segment,
                        diversity.overall
                    );
                    None
                }
            })
            .collect()
    }
}

/// Grouping key: expertise level plus the first three lowercased skills
pub fn profile_signature(profile: &ParticipantProfile) -> String {
    let skills: Vec<String> = profile
        .skills
        .iter()
        .take(SIGNATURE_SKILLS)
        .map(|s| s.trim().to_lowercase())
        .collect();
    format!("{}|{}", profile.expertise_level.as_str(), skills.join(","))
}

/// Round-robin across signature groups so neighbours differ as much as possible
pub fn interleave_by_signature<'a>(pool: &[&'a ParticipantProfile]) -> Vec<&'a ParticipantProfile> {
    let mut groups: BTreeMap<String, Vec<&'a ParticipantProfile>> = BTreeMap::new();
    for &profile in pool {
        groups.entry(profile_signature(profile)).or_default().push(profile);
    }

    let mut queues: Vec<std::vec::IntoIter<&'a ParticipantProfile>> =
        groups.into_values().map(Vec::into_iter).collect();
    let mut ordered = Vec::with_capacity(pool.len());

    while ordered.len() < pool.len() {
        for queue in queues.iter_mut() {
            if let Some(profile) = queue.next() {
                ordered.push(profile);
            }
        }
    }

    ordered
}
