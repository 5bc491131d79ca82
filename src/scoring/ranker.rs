use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::error::DataIntegrityWarning;
use crate::race::types::{Bib, RaceResult, Runner};

/// One line of the individual results. Built fresh on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based overall place; dead heats share a place
    pub place: u32,
    pub bib: Bib,
    pub name: String,
    pub finish_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

/// Ranked finishers plus the results that were left out and why
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    pub entries: Vec<RankedEntry>,
    pub orphan_results: Vec<RaceResult>,
    pub duplicate_results: Vec<RaceResult>,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Order results by finish time and assign places.
///
/// Results are taken in recording order: the first result for a bib wins and
/// later ones are reported as duplicates. Results for unknown bibs are
/// reported as orphans, as are negative or non-finite times. Identical times
/// share a place and the next time resumes at `place + group size`.
pub fn rank(results: &[RaceResult], runners: &HashMap<Bib, Runner>) -> Ranking {
    let mut ranking = Ranking::default();
    let mut seen: HashSet<Bib> = HashSet::new();
    let mut accepted: Vec<(&RaceResult, &Runner)> = Vec::with_capacity(results.len());

    for result in results {
        let Some(runner) = runners.get(&result.bib) else {
            warn!(bib = result.bib, "orphan result");
            ranking
                .warnings
                .push(DataIntegrityWarning::OrphanResult { bib: result.bib });
            ranking.orphan_results.push(result.clone());
            continue;
        };
        if !seen.insert(result.bib) {
            warn!(bib = result.bib, "duplicate result");
            ranking
                .warnings
                .push(DataIntegrityWarning::DuplicateResult { bib: result.bib });
            ranking.duplicate_results.push(result.clone());
            continue;
        }
        if !result.finish_time.is_finite() || result.finish_time < 0.0 {
            warn!(bib = result.bib, finish_time = result.finish_time, "invalid finish time");
            ranking.warnings.push(DataIntegrityWarning::InvalidFinishTime {
                bib: result.bib,
                finish_time: result.finish_time,
            });
            continue;
        }
        accepted.push((result, runner));
    }

    // Stable, so dead heats keep recording order.
    accepted.sort_by(|a, b| a.0.finish_time.total_cmp(&b.0.finish_time));

    let mut place = 1u32;
    for group in accepted.chunk_by(|a, b| a.0.finish_time.to_bits() == b.0.finish_time.to_bits()) {
        for (result, runner) in group {
            ranking.entries.push(RankedEntry {
                place,
                bib: result.bib,
                name: runner.name.clone(),
                finish_time: result.finish_time,
                team: runner.team_name().map(str::to_string),
                age: runner.age.and_then(|age| i32::try_from(age).ok()),
            });
        }
        place += group.len() as u32;
    }

    debug!(
        ranked = ranking.entries.len(),
        orphans = ranking.orphan_results.len(),
        duplicates = ranking.duplicate_results.len(),
        "ranked results"
    );
    ranking
}
