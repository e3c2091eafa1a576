use super::config::ScoringConfig;

fn check_table(name: &str, table: &[f64], errors: &mut Vec<String>) {
    for (i, points) in table.iter().enumerate() {
        if !points.is_finite() || *points < 0.0 {
            errors.push(format!(
                "scoring.{}[{}]: points for P{} must be a non-negative number, got {}",
                name,
                i,
                i + 1,
                points
            ));
        }
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.race.is_empty() {
        errors.push("scoring.race: table must award points to at least P1".to_string());
    }
    check_table("race", &config.race, &mut errors);
    check_table("sprint", &config.sprint, &mut errors);

    if !config.fastest_lap_bonus.is_finite() || config.fastest_lap_bonus < 0.0 {
        errors.push(format!(
            "scoring.fastest_lap_bonus: must be non-negative, got {}",
            config.fastest_lap_bonus
        ));
    }

    if config.fastest_lap_bonus > 0.0 && config.fastest_lap_cutoff == 0 {
        errors.push(
            "scoring.fastest_lap_cutoff: must be at least 1 when a bonus is awarded".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
