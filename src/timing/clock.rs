use chrono::{DateTime, Local, NaiveDate};

use crate::race::types::{Bib, RaceResult};

/// Start of a timed race. Finish times are taken relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceClock {
    started_at: DateTime<Local>,
}

impl RaceClock {
    pub fn start(at: DateTime<Local>) -> Self {
        Self { started_at: at }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Calendar date the race is filed under (the day it started)
    pub fn race_date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }

    /// Seconds elapsed since the start, never negative
    pub fn elapsed_at(&self, now: DateTime<Local>) -> f64 {
        let elapsed = now - self.started_at;
        match elapsed.num_microseconds() {
            Some(micros) => (micros as f64 / 1_000_000.0).max(0.0),
            None => elapsed.num_milliseconds().max(0) as f64 / 1_000.0,
        }
    }

    /// Record a finish for `bib` at `now`
    pub fn record(&self, bib: Bib, now: DateTime<Local>) -> RaceResult {
        RaceResult {
            bib,
            finish_time: self.elapsed_at(now),
            race_date: self.race_date(),
        }
    }
}
