// Core algorithm exports
pub mod builder;
pub mod combinations;
pub mod diversity;
pub mod filters;
pub mod matcher;
pub mod reasoning;
pub mod scoring;

pub use builder::{DiverseTeamBuilder, FormedTeam};
pub use combinations::{combinations, index_combinations, MAX_COMBINATIONS};
pub use diversity::{diversity_score, DiversityBreakdown};
pub use filters::{matches_category_filters, CandidateFilters};
pub use matcher::{DiverseTeamOptions, MatchOptions, Matcher, MatcherConfig};
pub use reasoning::{assign_roles, generate_reasoning};
pub use scoring::{calculate_pairwise_score, calculate_team_score, skills_compatibility};
