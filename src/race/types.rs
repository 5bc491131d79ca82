use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Race bib number, unique within a race
pub type Bib = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceType {
    CrossCountry,
    RoadRace,
}

impl RaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaceType::CrossCountry => "cross_country",
            RaceType::RoadRace => "road_race",
        }
    }
}

impl fmt::Display for RaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaceType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cross_country" => Ok(RaceType::CrossCountry),
            "road_race" => Ok(RaceType::RoadRace),
            other => Err(EngineError::Configuration(format!(
                "unrecognized race type '{}' (expected cross_country or road_race)",
                other
            ))),
        }
    }
}

/// An entrant as imported into the runner store.
///
/// Cross-country runners carry `team`, `age` and `grade`; road-race runners
/// carry `date_of_birth`. Attributes for the other race type are left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runner {
    pub bib: Bib,
    pub name: String,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub rfid: Option<String>,
}

impl Runner {
    /// Team name, ignoring blank values
    pub fn team_name(&self) -> Option<&str> {
        self.team
            .as_deref()
            .map(str::trim)
            .filter(|team| !team.is_empty())
    }

    /// Age on `race_date` from date of birth, falling back to a supplied age.
    ///
    /// Whole years only: the count drops by one if the race falls before the
    /// runner's birthday that year. A birth date after the race gives a
    /// negative age.
    pub fn age_on(&self, race_date: NaiveDate) -> Option<i32> {
        match self.date_of_birth {
            Some(dob) => {
                let mut age = race_date.year() - dob.year();
                if (race_date.month(), race_date.day()) < (dob.month(), dob.day()) {
                    age -= 1;
                }
                Some(age)
            }
            None => self.age.and_then(|age| i32::try_from(age).ok()),
        }
    }
}

/// A recorded finish. Results are append-only; input order is recording order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub bib: Bib,
    /// Seconds since race start
    pub finish_time: f64,
    pub race_date: NaiveDate,
}
