use serde::Serialize;

use super::age_group::{AgeBracket, AgeGroupEntry, AgeGroupResult};
use super::ranker::RankedEntry;
use crate::error::EngineError;

pub const DEFAULT_AWARD_DEPTH: u32 = 3;

/// Number of award places, always at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AwardDepth(u32);

impl AwardDepth {
    pub fn new(depth: i64) -> Result<Self, EngineError> {
        if depth < 1 {
            return Err(EngineError::Configuration(format!(
                "award depth must be at least 1, got {}",
                depth
            )));
        }
        u32::try_from(depth)
            .map(AwardDepth)
            .map_err(|_| EngineError::Configuration(format!("award depth {} is too large", depth)))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for AwardDepth {
    fn default() -> Self {
        AwardDepth(DEFAULT_AWARD_DEPTH)
    }
}

/// Everyone placed within the first `depth` places.
///
/// A dead heat straddling the cut-off is kept whole, so the result can be
/// longer than `depth`.
pub fn top_n(entries: &[RankedEntry], depth: AwardDepth) -> Vec<RankedEntry> {
    cut(entries, depth, |e| e.place)
}

/// Award winners within one age group, by group place
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupAwards {
    pub bracket: AgeBracket,
    pub winners: Vec<AgeGroupEntry>,
}

/// `top_n` applied inside each age group
pub fn age_group_awards(groups: &[AgeGroupResult], depth: AwardDepth) -> Vec<AgeGroupAwards> {
    groups
        .iter()
        .map(|group| AgeGroupAwards {
            bracket: group.bracket,
            winners: cut(&group.entries, depth, |e| e.group_place),
        })
        .collect()
}

// Places are competition-ranked, so every entry placed at or above `depth`
// is inside the cut and a tied group never straddles it partially.
fn cut<T: Clone>(entries: &[T], depth: AwardDepth, place: impl Fn(&T) -> u32) -> Vec<T> {
    entries
        .iter()
        .take_while(|e| place(*e) <= depth.get())
        .cloned()
        .collect()
}
