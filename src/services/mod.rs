// Service exports
pub mod profiles;
pub mod repository;

pub use profiles::{ProfileStore, ProfileStoreError};
pub use repository::{InMemoryMatchRepository, MatchRepository, RepositoryError};
