use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::types::{RaceResult, RaceType, Runner};
use crate::error::EngineError;
use crate::scoring::{RaceInput, RaceReport};

/// Runners and results for one race, as exported from the runner store.
///
/// `race_type` stays a plain tag here so that an unknown value surfaces as a
/// configuration error rather than a JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub race_type: String,
    pub race_date: NaiveDate,
    #[serde(default)]
    pub runners: Vec<Runner>,
    #[serde(default)]
    pub results: Vec<RaceResult>,
}

impl RaceSnapshot {
    pub fn into_input(self) -> Result<RaceInput, EngineError> {
        let race_type: RaceType = self.race_type.parse()?;
        Ok(RaceInput {
            race_type,
            race_date: self.race_date,
            runners: self.runners,
            results: self.results,
        })
    }
}

/// Load a race snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<RaceSnapshot> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open race snapshot at {}", path.display()))?;

    let snapshot: RaceSnapshot = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse race snapshot in {}", path.display()))?;

    Ok(snapshot)
}

/// Write a scored report as pretty JSON.
///
/// Uses atomic-write-file so a reader never sees a half-written report.
pub fn save_report(path: &Path, report: &RaceReport) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize race report")?;
    file.write_all(b"\n")
        .context("Failed to write race report")?;

    file.commit()
        .with_context(|| format!("Failed to commit race report to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{score_race, EngineConfig};
    use std::fs;

    const SNAPSHOT: &str = r#"{
        "race_type": "road_race",
        "race_date": "2025-05-10",
        "runners": [
            { "bib": 1, "name": "Ann", "date_of_birth": "1990-01-02" },
            { "bib": 2, "name": "Bo", "date_of_birth": "2012-07-01", "rfid": "E200-01" }
        ],
        "results": [
            { "bib": 2, "finish_time": 1201.5, "race_date": "2025-05-10" },
            { "bib": 1, "finish_time": 1100.25, "race_date": "2025-05-10" }
        ]
    }"#;

    #[test]
    fn test_load_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.json");
        fs::write(&path, SNAPSHOT).unwrap();

        let snapshot = load_snapshot(&path).unwrap();
        assert_eq!(snapshot.runners.len(), 2);
        assert_eq!(snapshot.results.len(), 2);
        assert_eq!(snapshot.runners[1].rfid.as_deref(), Some("E200-01"));

        let input = snapshot.into_input().unwrap();
        assert_eq!(input.race_type, RaceType::RoadRace);
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open race snapshot"));
    }

    #[test]
    fn test_unknown_race_type_is_configuration_error() {
        let snapshot = RaceSnapshot {
            race_type: "relay".to_string(),
            race_date: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            runners: vec![],
            results: vec![],
        };
        assert!(matches!(
            snapshot.into_input(),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn test_save_report_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot_path = dir.path().join("race.json");
        fs::write(&snapshot_path, SNAPSHOT).unwrap();
        let input = load_snapshot(&snapshot_path).unwrap().into_input().unwrap();
        let report = score_race(&input, &EngineConfig::default());

        let report_path = dir.path().join("report.json");
        save_report(&report_path, &report).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(written["race_type"], "road_race");
        assert_eq!(written["individual"][0]["bib"], 1);
        assert_eq!(written["individual"][0]["place"], 1);
    }
}
