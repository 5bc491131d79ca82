use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::age_group::{classify, AgeGroupResult};
use super::awards::{age_group_awards, top_n, AgeGroupAwards};
use super::config::EngineConfig;
use super::ranker::{rank, RankedEntry};
use super::team::{score_teams, TeamStanding};
use crate::error::DataIntegrityWarning;
use crate::race::types::{Bib, RaceResult, RaceType, Runner};

/// A consistent snapshot of one race handed over by the runner store
#[derive(Debug, Clone)]
pub struct RaceInput {
    pub race_type: RaceType,
    pub race_date: NaiveDate,
    pub runners: Vec<Runner>,
    pub results: Vec<RaceResult>,
}

/// Records left out of some aggregation, with the reason for each
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub orphan_results: Vec<RaceResult>,
    pub duplicate_results: Vec<RaceResult>,
    pub warnings: Vec<DataIntegrityWarning>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceReport {
    pub race_type: RaceType,
    pub race_date: NaiveDate,
    pub individual: Vec<RankedEntry>,
    /// Cross-country only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<TeamStanding>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unscored_teams: Vec<String>,
    /// Road race only
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub age_groups: Vec<AgeGroupResult>,
    pub awards: Vec<RankedEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub age_group_awards: Vec<AgeGroupAwards>,
    pub diagnostics: Diagnostics,
}

/// Score one race.
///
/// Ranks the results once, then builds team standings for cross-country or
/// age groups for road races. Awards are taken from the overall ranking for
/// both. Bad records never fail the run; they are listed in the diagnostics.
pub fn score_race(input: &RaceInput, config: &EngineConfig) -> RaceReport {
    let mut diagnostics = Diagnostics::default();

    let mut runners: HashMap<Bib, Runner> = HashMap::with_capacity(input.runners.len());
    for runner in &input.runners {
        if runners.contains_key(&runner.bib) {
            warn!(bib = runner.bib, "bib assigned to more than one runner");
            diagnostics
                .warnings
                .push(DataIntegrityWarning::DuplicateRunner { bib: runner.bib });
            continue;
        }
        runners.insert(runner.bib, runner.clone());
    }

    let ranking = rank(&input.results, &runners);
    diagnostics.orphan_results = ranking.orphan_results;
    diagnostics.duplicate_results = ranking.duplicate_results;
    diagnostics.warnings.extend(ranking.warnings);
    let individual = ranking.entries;

    let mut report = RaceReport {
        race_type: input.race_type,
        race_date: input.race_date,
        awards: top_n(&individual, config.award_depth),
        individual,
        teams: Vec::new(),
        unscored_teams: Vec::new(),
        age_groups: Vec::new(),
        age_group_awards: Vec::new(),
        diagnostics,
    };

    match input.race_type {
        RaceType::CrossCountry => {
            let scoring = score_teams(&report.individual);
            debug!(
                teams = scoring.standings.len(),
                unscored = scoring.unscored_teams.len(),
                "scored teams"
            );
            report.teams = scoring.standings;
            report.unscored_teams = scoring.unscored_teams;
            report.diagnostics.warnings.extend(scoring.warnings);
        }
        RaceType::RoadRace => {
            let grouping = classify(&report.individual, &runners, input.race_date);
            debug!(groups = grouping.groups.len(), "classified age groups");
            report.age_group_awards =
                age_group_awards(&grouping.groups, config.age_group_award_depth);
            report.age_groups = grouping.groups;
            report.diagnostics.warnings.extend(grouping.warnings);
        }
    }

    report
}
