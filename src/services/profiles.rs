use crate::models::{normalize_email, ParticipantProfile};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors that can occur while loading or updating profiles
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
}

/// In-memory participant pool keyed by lowercased e-mail
///
/// Matching runs work on a `snapshot`, so later upserts never change a run
/// in progress.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<String, ParticipantProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a JSON array of profiles
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProfileStoreError> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let profiles: Vec<ParticipantProfile> = serde_json::from_slice(&bytes)?;

        let store = Self::new();
        for profile in profiles {
            store.upsert(profile).await?;
        }

        tracing::info!(
            "Loaded {} profiles from {}",
            store.len().await,
            path.as_ref().display()
        );
        Ok(store)
    }

    /// Insert or replace a profile; returns true when it was new
    pub async fn upsert(&self, profile: ParticipantProfile) -> Result<bool, ProfileStoreError> {
        validate_profile(&profile)?;

        let key = profile.key();
        let mut profiles = self.profiles.write().await;
        let created = profiles.insert(key.clone(), profile).is_none();

        tracing::debug!("Upserted profile {} (new: {})", key, created);
        Ok(created)
    }

    pub async fn get(&self, email: &str) -> Option<ParticipantProfile> {
        self.profiles.read().await.get(&normalize_email(email)).cloned()
    }

    /// Immutable copy of the pool for one matching run, ordered by e-mail
    pub async fn snapshot(&self) -> Vec<ParticipantProfile> {
        let profiles = self.profiles.read().await;
        let mut snapshot: Vec<ParticipantProfile> = profiles.values().cloned().collect();
        snapshot.sort_by_key(|p| p.key());
        snapshot
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn validate_profile(profile: &ParticipantProfile) -> Result<(), ProfileStoreError> {
    let email = profile.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(ProfileStoreError::InvalidProfile(format!(
            "invalid email '{}'",
            profile.email
        )));
    }
    if profile.full_name.trim().is_empty() {
        return Err(ProfileStoreError::InvalidProfile(format!(
            "missing full name for {}",
            profile.email
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn profile(email: &str, name: &str) -> ParticipantProfile {
        serde_json::from_value(serde_json::json!({
            "email": email,
            "fullName": name,
            "age": 22,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_is_case_insensitive() {
        let store = ProfileStore::new();

        assert!(store.upsert(profile("Ada@x.io", "Ada")).await.unwrap());
        assert!(!store.upsert(profile("ada@X.IO", "Ada L.")).await.unwrap());

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("ADA@x.io").await.unwrap().full_name, "Ada L.");
    }

    #[tokio::test]
    async fn test_rejects_invalid_profiles() {
        let store = ProfileStore::new();

        assert!(matches!(
            store.upsert(profile("not-an-email", "X")).await,
            Err(ProfileStoreError::InvalidProfile(_))
        ));
        assert!(matches!(
            store.upsert(profile("x@x.io", "  ")).await,
            Err(ProfileStoreError::InvalidProfile(_))
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let store = ProfileStore::new();
        store.upsert(profile("b@x.io", "B")).await.unwrap();
        store.upsert(profile("a@x.io", "A")).await.unwrap();

        let snapshot = store.snapshot().await;
        store.upsert(profile("c@x.io", "C")).await.unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].email, "a@x.io");
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"email": "a@x.io", "fullName": "A", "age": 30}},
                {{"email": "b@x.io", "fullName": "B", "age": 17, "skills": ["Rust"]}}]"#
        )
        .unwrap();

        let store = ProfileStore::load_from_file(file.path()).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert!(store.get("b@x.io").await.unwrap().is_minor());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = ProfileStore::load_from_file("/nonexistent/profiles.json").await;
        assert!(matches!(result, Err(ProfileStoreError::Io(_))));
    }
}
