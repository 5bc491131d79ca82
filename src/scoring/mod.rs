pub mod age_group;
pub mod awards;
pub mod config;
pub mod engine;
pub mod ranker;
pub mod team;
pub mod validation;

pub use age_group::{classify, AgeBracket, AgeGroupEntry, AgeGroupResult, AGE_BRACKETS};
pub use awards::{age_group_awards, top_n, AgeGroupAwards, AwardDepth};
pub use config::{EngineConfig, ScoringConfig};
pub use engine::{score_race, Diagnostics, RaceInput, RaceReport};
pub use ranker::{rank, RankedEntry, Ranking};
pub use team::{score_teams, TeamScoreSummary, TeamStanding};
pub use validation::validate_scoring;
