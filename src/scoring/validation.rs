use super::awards::AwardDepth;
use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let depths = [
        ("scoring.award_depth", config.award_depth),
        ("scoring.age_group_award_depth", config.age_group_award_depth),
    ];
    for (field, depth) in depths {
        if let Some(depth) = depth {
            if let Err(e) = AwardDepth::new(depth) {
                errors.push(format!("{}: {}", field, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
