// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod team;

pub use domain::{
    normalize_email, CommunicationStyle, DiversityWeights, ExpertiseLevel, Gender,
    ParticipantPreferences, ParticipantProfile, Project, ScoringWeights, TeamSizePreference,
    WorkExperience, WorkStyle,
};
pub use requests::{
    DiverseTeamsRequest, FindMatchesRequest, IndividualMatchRequest, RecommendationsRequest,
    StatusUpdateRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, IndividualMatchResponse, MatchesResponse, ProfileResponse,
};
pub use team::{
    MatchMetadata, MatchReasoning, MatchScore, MatchStateError, MatchStatus, TeamMatch,
    TeamMatchRecord, TeamSegment,
};
