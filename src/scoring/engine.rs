use chrono::{DateTime, Utc};

use super::config::SalesConfig;
use crate::leads::{LeadRecord, SubscriptionTier};

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Certificates", "Subscription"
    pub description: String, // e.g. "2 certificates, weight 0.2"
    pub before: f64,         // Probability before this factor
    pub after: f64,          // Probability after this factor
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub base_probability: f64,
    pub factors: Vec<FactorContribution>,
    /// True when the raw total exceeded the configured maximum
    pub capped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub probability: u32,
    pub breakdown: ScoreBreakdown,
}

/// Lead conversion probability in percent, capped at `max_probability`.
pub fn calculate_sales_probability(
    record: &LeadRecord,
    config: &SalesConfig,
    as_of: DateTime<Utc>,
) -> u32 {
    score_lead(record, config, as_of).probability
}

/// Score a lead and record every signal that moved the probability.
///
/// Weighted signals add `weight * 100` points; subscription bonuses are
/// flat points. `recent_activity_weight` is applied independently for high
/// savings and for a recent login, so it can count twice.
pub fn score_lead(record: &LeadRecord, config: &SalesConfig, as_of: DateTime<Utc>) -> ScoreResult {
    let scoring = &config.lead_scoring;
    let factors_config = &config.priority_factors;
    let base_probability = scoring.base_probability;
    let mut probability = base_probability;
    let mut factors = Vec::new();

    let mut apply = |label: &str, description: String, points: f64| {
        let before = probability;
        probability += points;
        factors.push(FactorContribution {
            label: label.to_string(),
            description,
            before,
            after: probability,
        });
    };

    let certificates = record.certificates_generated();
    if certificates > 0 {
        apply(
            "Certificates",
            format!(
                "{} certificates, weight {}",
                certificates, scoring.certificates_generated_weight
            ),
            scoring.certificates_generated_weight * 100.0,
        );
    }

    let completions = record.workflow_completions();
    if completions >= factors_config.workflow_threshold {
        apply(
            "Workflows",
            format!(
                "{} completions (>= {}), weight {}",
                completions, factors_config.workflow_threshold, scoring.workflow_completions_weight
            ),
            scoring.workflow_completions_weight * 100.0,
        );
    }

    let bonus = match record.subscription_tier() {
        SubscriptionTier::Enterprise => Some(("enterprise", scoring.subscription_bonus.enterprise)),
        SubscriptionTier::Professional => {
            Some(("professional", scoring.subscription_bonus.professional))
        }
        SubscriptionTier::Basic => Some(("basic", scoring.subscription_bonus.basic)),
        SubscriptionTier::None => None,
    };
    if let Some((tier, points)) = bonus {
        if points != 0.0 {
            apply("Subscription", format!("{} tier, {:+} flat", tier, points), points);
        }
    }

    let savings = record.total_savings();
    if savings > factors_config.high_savings_threshold {
        apply(
            "Savings",
            format!(
                "{:.0} saved (> {:.0}), weight {}",
                savings, factors_config.high_savings_threshold, scoring.recent_activity_weight
            ),
            scoring.recent_activity_weight * 100.0,
        );
    }

    if let Some(days) = record.days_since_login(as_of) {
        if days <= factors_config.recent_activity_days {
            apply(
                "Recent Login",
                format!(
                    "{} days ago (<= {}), weight {}",
                    days, factors_config.recent_activity_days, scoring.recent_activity_weight
                ),
                scoring.recent_activity_weight * 100.0,
            );
        }
    }

    let rounded = probability.round();
    let capped = rounded > scoring.max_probability;
    let final_probability = rounded.min(scoring.max_probability).max(0.0) as u32;

    ScoreResult {
        probability: final_probability,
        breakdown: ScoreBreakdown {
            base_probability,
            factors,
            capped,
        },
    }
}
