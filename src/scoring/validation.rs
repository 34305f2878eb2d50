use std::time::Duration;

use super::config::SalesConfig;

/// Longest follow-up offset accepted (ten years)
const MAX_FOLLOW_UP_OFFSET: Duration = Duration::from_secs(3_650 * 86_400);

/// Validate sales configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_sales_config(config: &SalesConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    validate_deal_tiers(config, &mut errors);
    validate_lead_scoring(config, &mut errors);
    validate_pipeline_stages(config, &mut errors);
    validate_follow_up(config, &mut errors);

    if config.priority_factors.recent_activity_days < 0 {
        errors.push("sales.priority_factors.recent_activity_days: must be non-negative".to_string());
    }
    for (field, value) in [
        ("high_volume_threshold", config.priority_factors.high_volume_threshold),
        ("high_savings_threshold", config.priority_factors.high_savings_threshold),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!(
                "sales.priority_factors.{}: must be a non-negative number",
                field
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_deal_tiers(config: &SalesConfig, errors: &mut Vec<String>) {
    let tiers = &config.deal_tiers;
    if tiers.is_empty() {
        errors.push("sales.deal_tiers: at least one tier is required".to_string());
        return;
    }

    for (i, tier) in tiers.iter().enumerate() {
        if tier.name.trim().is_empty() {
            errors.push(format!("sales.deal_tiers[{}].name: must not be empty", i));
        }
        if !tier.threshold.is_finite() || tier.threshold < 0.0 {
            errors.push(format!(
                "sales.deal_tiers[{}].threshold: must be a non-negative number",
                i
            ));
        }
        if !(0.0..=1.0).contains(&tier.percentage) {
            errors.push(format!(
                "sales.deal_tiers[{}].percentage: {} is outside 0-1",
                i, tier.percentage
            ));
        }
    }

    for (i, pair) in tiers.windows(2).enumerate() {
        let (higher, lower) = (&pair[0], &pair[1]);
        if higher.threshold <= lower.threshold {
            errors.push(format!(
                "sales.deal_tiers[{}].threshold: must be below {} ('{}'), tiers are listed highest first",
                i + 1,
                higher.threshold,
                higher.name
            ));
        } else if higher.fee_for(higher.threshold) < lower.fee_for(higher.threshold) {
            errors.push(format!(
                "sales.deal_tiers[{}]: fee drops from {} to {} when volume reaches {}",
                i,
                lower.fee_for(higher.threshold),
                higher.fee_for(higher.threshold),
                higher.threshold
            ));
        }
    }

    let terminal: Vec<usize> = tiers
        .iter()
        .enumerate()
        .filter(|(_, tier)| tier.threshold == 0.0)
        .map(|(i, _)| i)
        .collect();
    match terminal.as_slice() {
        [] => errors.push("sales.deal_tiers: a terminal tier with threshold 0 is required".to_string()),
        [i] if *i != tiers.len() - 1 => errors.push(format!(
            "sales.deal_tiers[{}]: the threshold 0 tier must be listed last",
            i
        )),
        [_] => {}
        _ => errors.push("sales.deal_tiers: only one tier may have threshold 0".to_string()),
    }
}

fn validate_lead_scoring(config: &SalesConfig, errors: &mut Vec<String>) {
    let scoring = &config.lead_scoring;

    for (field, weight) in [
        ("certificates_generated_weight", scoring.certificates_generated_weight),
        ("workflow_completions_weight", scoring.workflow_completions_weight),
        ("recent_activity_weight", scoring.recent_activity_weight),
    ] {
        if !(0.0..=1.0).contains(&weight) {
            errors.push(format!(
                "sales.lead_scoring.{}: {} is outside 0-1",
                field, weight
            ));
        }
    }

    let bonus = &scoring.subscription_bonus;
    for (tier, points) in [
        ("enterprise", bonus.enterprise),
        ("professional", bonus.professional),
        ("basic", bonus.basic),
    ] {
        if !points.is_finite() || points < 0.0 {
            errors.push(format!(
                "sales.lead_scoring.subscription_bonus.{}: must be non-negative",
                tier
            ));
        }
    }

    if !(0.0..=100.0).contains(&scoring.base_probability) {
        errors.push("sales.lead_scoring.base_probability: must be between 0 and 100".to_string());
    }
    if !(0.0..=100.0).contains(&scoring.max_probability) {
        errors.push("sales.lead_scoring.max_probability: must be between 0 and 100".to_string());
    } else if scoring.max_probability < scoring.base_probability {
        errors.push(
            "sales.lead_scoring.max_probability: must not be below base_probability".to_string(),
        );
    }
}

fn validate_pipeline_stages(config: &SalesConfig, errors: &mut Vec<String>) {
    for (key, stage) in config.pipeline_stages.iter() {
        if stage.name.trim().is_empty() {
            errors.push(format!("sales.pipeline_stages.{}.name: must not be empty", key));
        }
        if !(0.0..=1.0).contains(&stage.probability) {
            errors.push(format!(
                "sales.pipeline_stages.{}.probability: {} is outside 0-1",
                key, stage.probability
            ));
        }
    }
    if config.pipeline_stages.proposal.actions.is_empty() {
        errors.push("sales.pipeline_stages.proposal.actions: at least one action is required".to_string());
    }
}

fn validate_follow_up(config: &SalesConfig, errors: &mut Vec<String>) {
    let follow_up = &config.follow_up;
    for (field, value) in [
        ("certified", &follow_up.certified),
        ("engaged", &follow_up.engaged),
        ("default", &follow_up.default),
    ] {
        match humantime::parse_duration(value.trim()) {
            Ok(offset) if offset > MAX_FOLLOW_UP_OFFSET => errors.push(format!(
                "sales.follow_up.{}: '{}' exceeds the {}-day maximum",
                field,
                value,
                MAX_FOLLOW_UP_OFFSET.as_secs() / 86_400
            )),
            Ok(_) => {}
            Err(e) => errors.push(format!(
                "sales.follow_up.{}: invalid duration '{}' - {}",
                field, value, e
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::DealTier;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_sales_config(&SalesConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_tiers() {
        let config = SalesConfig {
            deal_tiers: vec![],
            ..SalesConfig::default()
        };
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors[0].contains("at least one tier"));
    }

    #[test]
    fn test_thresholds_must_decrease() {
        let config = SalesConfig {
            deal_tiers: vec![
                DealTier::new("small", 1_000.0, 0.02, 10),
                DealTier::new("big", 5_000.0, 0.05, 100),
                DealTier::new("base", 0.0, 0.01, 1),
            ],
            ..SalesConfig::default()
        };
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("sales.deal_tiers[1].threshold")));
    }

    #[test]
    fn test_terminal_tier_required() {
        let config = SalesConfig {
            deal_tiers: vec![DealTier::new("only", 100.0, 0.1, 10)],
            ..SalesConfig::default()
        };
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("threshold 0 is required")));
    }

    #[test]
    fn test_fee_drop_at_boundary() {
        // At 1000 the lower tier charges 500 but the upper tier only 100
        let config = SalesConfig {
            deal_tiers: vec![
                DealTier::new("upper", 1_000.0, 0.1, 0),
                DealTier::new("lower", 0.0, 0.0, 500),
            ],
            ..SalesConfig::default()
        };
        let errors = validate_sales_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("fee drops from 500 to 100"));
    }

    #[test]
    fn test_percentage_out_of_range() {
        let mut config = SalesConfig::default();
        config.deal_tiers[0].percentage = 1.5;
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors[0].contains("sales.deal_tiers[0].percentage"));
    }

    #[test]
    fn test_invalid_weight() {
        let mut config = SalesConfig::default();
        config.lead_scoring.recent_activity_weight = -0.1;
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors[0].contains("recent_activity_weight"));
    }

    #[test]
    fn test_max_below_base() {
        let mut config = SalesConfig::default();
        config.lead_scoring.base_probability = 50.0;
        config.lead_scoring.max_probability = 40.0;
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors[0].contains("max_probability"));
    }

    #[test]
    fn test_proposal_actions_required() {
        let mut config = SalesConfig::default();
        config.pipeline_stages.proposal.actions.clear();
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors[0].contains("proposal.actions"));
    }

    #[test]
    fn test_invalid_follow_up_duration() {
        let mut config = SalesConfig::default();
        config.follow_up.engaged = "two days".to_string();
        let errors = validate_sales_config(&config).unwrap_err();
        assert!(errors[0].contains("sales.follow_up.engaged"));
    }

    #[test]
    fn test_follow_up_offset_too_long() {
        let mut config = SalesConfig::default();
        config.follow_up.default = "100000000years".to_string();
        let errors = validate_sales_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("sales.follow_up.default"));
        assert!(errors[0].contains("3650-day maximum"));
    }

    #[test]
    fn test_follow_up_offset_at_maximum() {
        let mut config = SalesConfig::default();
        config.follow_up.default = "3650days".to_string();
        assert!(validate_sales_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SalesConfig::default();
        config.lead_scoring.workflow_completions_weight = 2.0; // Error 1
        config.pipeline_stages.negotiation.probability = 1.5; // Error 2
        config.follow_up.default = "bad".to_string(); // Error 3
        let errors = validate_sales_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
