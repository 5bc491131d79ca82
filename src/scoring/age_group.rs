use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use super::ranker::RankedEntry;
use crate::error::DataIntegrityWarning;
use crate::race::types::{Bib, Runner};

/// Inclusive age range. `high: None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBracket {
    pub low: i32,
    pub high: Option<i32>,
}

impl AgeBracket {
    const fn closed(low: i32, high: i32) -> Self {
        Self {
            low,
            high: Some(high),
        }
    }

    pub fn contains(&self, age: i32) -> bool {
        age >= self.low && self.high.map_or(true, |high| age <= high)
    }

    /// Label such as "21-25" or "71+"
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.high {
            Some(high) => write!(f, "{}-{}", self.low, high),
            None => write!(f, "{}+", self.low),
        }
    }
}

impl Serialize for AgeBracket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Road-race brackets. Contiguous from 1 with the last one open-ended.
pub const AGE_BRACKETS: [AgeBracket; 13] = [
    AgeBracket::closed(1, 15),
    AgeBracket::closed(16, 20),
    AgeBracket::closed(21, 25),
    AgeBracket::closed(26, 30),
    AgeBracket::closed(31, 35),
    AgeBracket::closed(36, 40),
    AgeBracket::closed(41, 45),
    AgeBracket::closed(46, 50),
    AgeBracket::closed(51, 55),
    AgeBracket::closed(56, 60),
    AgeBracket::closed(61, 65),
    AgeBracket::closed(66, 70),
    AgeBracket {
        low: 71,
        high: None,
    },
];

pub fn bracket_for(age: i32) -> Option<AgeBracket> {
    AGE_BRACKETS.iter().copied().find(|b| b.contains(age))
}

/// A finisher within an age group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupEntry {
    /// 1-based place within the group
    pub group_place: u32,
    /// Overall entry; `place` is the overall place
    #[serde(flatten)]
    pub entry: RankedEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroupResult {
    pub bracket: AgeBracket,
    pub entries: Vec<AgeGroupEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct AgeGrouping {
    /// Non-empty groups, youngest bracket first
    pub groups: Vec<AgeGroupResult>,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Split the overall ranking into age groups as of `race_date`.
///
/// Group places follow overall order; runners sharing an overall place share
/// their group place too. Runners with no usable age are left out and
/// reported.
pub fn classify(
    entries: &[RankedEntry],
    runners: &HashMap<Bib, Runner>,
    race_date: NaiveDate,
) -> AgeGrouping {
    let mut grouping = AgeGrouping::default();
    let mut members: Vec<Vec<RankedEntry>> = vec![Vec::new(); AGE_BRACKETS.len()];

    for entry in entries {
        let age = runners.get(&entry.bib).and_then(|r| r.age_on(race_date));
        let Some(age) = age else {
            grouping
                .warnings
                .push(DataIntegrityWarning::MissingAge { bib: entry.bib });
            continue;
        };
        let Some(index) = AGE_BRACKETS.iter().position(|b| b.contains(age)) else {
            grouping.warnings.push(DataIntegrityWarning::UnbracketedAge {
                bib: entry.bib,
                age,
            });
            continue;
        };
        let mut entry = entry.clone();
        entry.age = Some(age);
        members[index].push(entry);
    }

    for (bracket, entries) in AGE_BRACKETS.iter().zip(members) {
        if entries.is_empty() {
            continue;
        }
        let mut numbered: Vec<AgeGroupEntry> = Vec::with_capacity(entries.len());
        for (i, entry) in entries.into_iter().enumerate() {
            let group_place = match numbered.last() {
                Some(prev) if prev.entry.place == entry.place => prev.group_place,
                _ => i as u32 + 1,
            };
            numbered.push(AgeGroupEntry { group_place, entry });
        }
        grouping.groups.push(AgeGroupResult {
            bracket: *bracket,
            entries: numbered,
        });
    }

    grouping
}
