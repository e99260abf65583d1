use crate::models::{MatchStateError, MatchStatus, TeamMatch};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors that can occur when persisting matches
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("match already exists: {0}")]
    Conflict(String),

    #[error("match not found: {0}")]
    NotFound(String),

    #[error("invalid state: {0}")]
    InvalidState(#[from] MatchStateError),

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Persistence port for generated matches
///
/// Implementations serialize writers so that two updates of the same match
/// id can never interleave.
pub trait MatchRepository: Send + Sync {
    /// Store a new match; an existing id is a conflict
    fn save(&self, team: TeamMatch) -> Result<TeamMatch, RepositoryError>;

    /// Apply a participant-requested status transition atomically
    fn update_status(
        &self,
        id: &str,
        status: MatchStatus,
        requester: &str,
    ) -> Result<TeamMatch, RepositoryError>;

    fn find_by_id(&self, id: &str) -> Result<Option<TeamMatch>, RepositoryError>;

    /// Matches a participant belongs to, newest first
    fn find_by_participant(&self, email: &str) -> Result<Vec<TeamMatch>, RepositoryError>;

    /// Expire suggested matches older than `ttl`; returns how many changed
    fn expire_stale(&self, now: DateTime<Utc>, ttl: Duration) -> Result<usize, RepositoryError>;
}

/// In-memory repository guarded by a single lock
#[derive(Debug, Default)]
pub struct InMemoryMatchRepository {
    matches: RwLock<HashMap<String, TeamMatch>>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.matches.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("match store lock poisoned".to_string())
}

impl MatchRepository for InMemoryMatchRepository {
    fn save(&self, team: TeamMatch) -> Result<TeamMatch, RepositoryError> {
        let mut matches = self.matches.write().map_err(poisoned)?;
        if matches.contains_key(&team.id) {
            return Err(RepositoryError::Conflict(team.id));
        }

        tracing::debug!("Saved match {} ({} participants)", team.id, team.team_size());
        matches.insert(team.id.clone(), team.clone());
        Ok(team)
    }

    fn update_status(
        &self,
        id: &str,
        status: MatchStatus,
        requester: &str,
    ) -> Result<TeamMatch, RepositoryError> {
        let mut matches = self.matches.write().map_err(poisoned)?;
        let current = matches
            .get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        let updated = current.transition_by(requester, status)?;
        matches.insert(id.to_string(), updated.clone());

        tracing::info!("Match {} moved to {} by {}", id, status, requester);
        Ok(updated)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<TeamMatch>, RepositoryError> {
        let matches = self.matches.read().map_err(poisoned)?;
        Ok(matches.get(id).cloned())
    }

    fn find_by_participant(&self, email: &str) -> Result<Vec<TeamMatch>, RepositoryError> {
        let matches = self.matches.read().map_err(poisoned)?;
        let mut found: Vec<TeamMatch> = matches
            .values()
            .filter(|m| m.has_participant(email))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    fn expire_stale(&self, now: DateTime<Utc>, ttl: Duration) -> Result<usize, RepositoryError> {
        let mut matches = self.matches.write().map_err(poisoned)?;
        let mut expired = 0;

        for team in matches.values_mut() {
            if team.status == MatchStatus::Suggested && now - team.created_at > ttl {
                *team = team.expire()?;
                expired += 1;
            }
        }

        if expired > 0 {
            tracing::info!("Expired {} stale matches", expired);
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchReasoning, MatchScore, ScoringWeights};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn sample_match() -> TeamMatch {
        TeamMatch::new(
            vec!["a@x.io".to_string(), "b@x.io".to_string()],
            MatchScore::from_components(0.5, 0.5, 0.5, 0.5, None, &ScoringWeights::default()),
            MatchReasoning::default(),
            BTreeMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_find() {
        let repo = InMemoryMatchRepository::new();
        let team = repo.save(sample_match()).unwrap();

        assert_eq!(repo.find_by_id(&team.id).unwrap(), Some(team.clone()));
        assert_eq!(repo.find_by_participant("B@X.io").unwrap().len(), 1);
        assert!(repo.find_by_participant("c@x.io").unwrap().is_empty());
    }

    #[test]
    fn test_len_reports_poisoned_lock() {
        let repo = Arc::new(InMemoryMatchRepository::new());
        repo.save(sample_match()).unwrap();
        assert_eq!(repo.len().unwrap(), 1);
        assert!(!repo.is_empty().unwrap());

        let poisoner = Arc::clone(&repo);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.matches.write().unwrap();
            panic!("poison the match store");
        })
        .join();

        assert!(matches!(repo.len(), Err(RepositoryError::Unavailable(_))));
        assert!(matches!(repo.is_empty(), Err(RepositoryError::Unavailable(_))));
    }

    #[test]
    fn test_duplicate_save_conflicts() {
        let repo = InMemoryMatchRepository::new();
        let team = sample_match();
        repo.save(team.clone()).unwrap();

        assert!(matches!(repo.save(team), Err(RepositoryError::Conflict(_))));
    }

    #[test]
    fn test_update_status_enforces_state_machine() {
        let repo = InMemoryMatchRepository::new();
        let team = repo.save(sample_match()).unwrap();

        let accepted = repo
            .update_status(&team.id, MatchStatus::Accepted, "a@x.io")
            .unwrap();
        assert_eq!(accepted.status, MatchStatus::Accepted);

        let again = repo.update_status(&team.id, MatchStatus::Accepted, "a@x.io");
        assert!(matches!(
            again,
            Err(RepositoryError::InvalidState(MatchStateError::InvalidTransition { .. }))
        ));

        let outsider = repo.update_status(&team.id, MatchStatus::Rejected, "z@x.io");
        assert!(matches!(
            outsider,
            Err(RepositoryError::InvalidState(MatchStateError::NotAParticipant(_)))
        ));

        assert!(matches!(
            repo.update_status("missing", MatchStatus::Accepted, "a@x.io"),
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_accepts_apply_once() {
        let repo = Arc::new(InMemoryMatchRepository::new());
        let team = repo.save(sample_match()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                let id = team.id.clone();
                std::thread::spawn(move || {
                    let who = if i % 2 == 0 { "a@x.io" } else { "b@x.io" };
                    repo.update_status(&id, MatchStatus::Accepted, who).is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }

    #[test]
    fn test_expire_stale() {
        let repo = InMemoryMatchRepository::new();
        let stale = repo.save(sample_match()).unwrap();
        let accepted = repo.save(sample_match()).unwrap();
        repo.update_status(&accepted.id, MatchStatus::Accepted, "a@x.io")
            .unwrap();

        let later = Utc::now() + Duration::hours(48);
        assert_eq!(repo.expire_stale(later, Duration::hours(24)).unwrap(), 1);

        let stale = repo.find_by_id(&stale.id).unwrap().unwrap();
        assert_eq!(stale.status, MatchStatus::Expired);
        let accepted = repo.find_by_id(&accepted.id).unwrap().unwrap();
        assert_eq!(accepted.status, MatchStatus::Accepted);
    }
}
