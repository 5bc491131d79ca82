use serde::{Deserialize, Serialize};

use super::awards::{AwardDepth, DEFAULT_AWARD_DEPTH};
use crate::error::EngineError;

/// Scoring section of the config file.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   award_depth: 3
///   age_group_award_depth: 1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Overall award places (default: 3)
    #[serde(default)]
    pub award_depth: Option<i64>,

    /// Award places within each road-race age group (default: 3)
    #[serde(default)]
    pub age_group_award_depth: Option<i64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            award_depth: Some(i64::from(DEFAULT_AWARD_DEPTH)),
            age_group_award_depth: Some(i64::from(DEFAULT_AWARD_DEPTH)),
        }
    }
}

impl ScoringConfig {
    /// Resolve into engine options, filling unset fields with defaults
    pub fn engine_config(&self) -> Result<EngineConfig, EngineError> {
        Ok(EngineConfig {
            award_depth: resolve_depth(self.award_depth)?,
            age_group_award_depth: resolve_depth(self.age_group_award_depth)?,
        })
    }
}

fn resolve_depth(depth: Option<i64>) -> Result<AwardDepth, EngineError> {
    depth.map(AwardDepth::new).unwrap_or_else(|| Ok(AwardDepth::default()))
}

/// Validated options for one scoring run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EngineConfig {
    pub award_depth: AwardDepth,
    pub age_group_award_depth: AwardDepth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.award_depth, Some(3));
        assert_eq!(config.age_group_award_depth, Some(3));
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = "award_depth: 5\n";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.award_depth, Some(5));
        assert!(config.age_group_award_depth.is_none());

        let engine = config.engine_config().unwrap();
        assert_eq!(engine.award_depth.get(), 5);
        assert_eq!(engine.age_group_award_depth.get(), 3);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.award_depth.is_none());
        assert_eq!(config.engine_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str("award_dept: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_depth_is_configuration_error() {
        let config = ScoringConfig {
            award_depth: Some(0),
            age_group_award_depth: None,
        };
        assert!(matches!(
            config.engine_config(),
            Err(EngineError::Configuration(_))
        ));
    }
}
