//! HackMatch - team matchmaking engine for hackathon participants
//!
//! Scores participant compatibility, searches bounded team combinations,
//! forms demographically segmented diverse teams, and tracks the lifecycle
//! of suggested matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{DiverseTeamOptions, MatchOptions, Matcher, MatcherConfig};
pub use models::{
    MatchScore, MatchStatus, ParticipantProfile, ScoringWeights, TeamMatch, TeamMatchRecord,
};
