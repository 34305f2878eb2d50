use serde::{Deserialize, Serialize};

/// Main sales scoring configuration.
///
/// Every section falls back to its stock values when omitted, so a config
/// file only needs to name what it overrides.
///
/// Example YAML:
/// ```yaml
/// sales:
///   deal_tiers:
///     - { name: enterprise, threshold: 10000000, percentage: 0.08, minimum_fee: 500000 }
///     - { name: starter, threshold: 0, percentage: 0.02, minimum_fee: 15000 }
///   priority_factors:
///     recent_activity_days: 14
///   follow_up:
///     default: "5d"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SalesConfig {
    /// Deal tiers, evaluated in listed order (highest threshold first)
    pub deal_tiers: Vec<DealTier>,

    /// Probability weights and flat bonuses
    pub lead_scoring: LeadScoring,

    /// Named pipeline stages with conversion probabilities and actions
    pub pipeline_stages: PipelineStages,

    /// Thresholds for recency, engagement and volume classification
    pub priority_factors: PriorityFactors,

    /// Follow-up offsets, as human durations ("1d", "48h")
    pub follow_up: FollowUpConfig,
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            deal_tiers: vec![
                DealTier::new("enterprise", 10_000_000.0, 0.08, 500_000),
                DealTier::new("mid_market", 1_000_000.0, 0.05, 75_000),
                DealTier::new("small_business", 250_000.0, 0.04, 25_000),
                DealTier::new("starter", 0.0, 0.02, 15_000),
            ],
            lead_scoring: LeadScoring::default(),
            pipeline_stages: PipelineStages::default(),
            priority_factors: PriorityFactors::default(),
            follow_up: FollowUpConfig::default(),
        }
    }
}

impl SalesConfig {
    /// The catch-all tier (threshold 0). Falls back to the last listed tier
    /// when no tier has a zero threshold.
    pub fn terminal_tier(&self) -> Option<&DealTier> {
        self.deal_tiers
            .iter()
            .find(|tier| tier.threshold == 0.0)
            .or_else(|| self.deal_tiers.last())
    }
}

/// Deal tier: a threshold/percentage/minimum-fee triple.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DealTier {
    pub name: String,
    /// Minimum trade volume (inclusive) for this tier
    pub threshold: f64,
    /// Fraction of trade volume charged (0-1)
    pub percentage: f64,
    /// Fee floor for the tier
    pub minimum_fee: u64,
}

impl DealTier {
    pub fn new(name: &str, threshold: f64, percentage: f64, minimum_fee: u64) -> Self {
        Self {
            name: name.to_string(),
            threshold,
            percentage,
            minimum_fee,
        }
    }

    /// Fee this tier charges for `volume`, ignoring whether the volume
    /// actually reaches the threshold.
    pub fn fee_for(&self, volume: f64) -> u64 {
        let calculated = (volume * self.percentage).floor().max(0.0) as u64;
        calculated.max(self.minimum_fee)
    }
}

/// Lead probability scoring.
///
/// Weights are multiplied by 100 and added as points. Subscription bonuses
/// are flat points and are not scaled.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LeadScoring {
    pub base_probability: f64,
    pub max_probability: f64,
    pub certificates_generated_weight: f64,
    pub workflow_completions_weight: f64,
    /// Applied twice: once for high savings, once for a recent login
    pub recent_activity_weight: f64,
    pub subscription_bonus: SubscriptionBonus,
}

impl Default for LeadScoring {
    fn default() -> Self {
        Self {
            base_probability: 10.0,
            max_probability: 95.0,
            certificates_generated_weight: 0.20,
            workflow_completions_weight: 0.25,
            recent_activity_weight: 0.15,
            subscription_bonus: SubscriptionBonus::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SubscriptionBonus {
    pub enterprise: f64,
    pub professional: f64,
    pub basic: f64,
}

impl Default for SubscriptionBonus {
    fn default() -> Self {
        Self {
            enterprise: 20.0,
            professional: 15.0,
            basic: 0.0,
        }
    }
}

/// Pipeline stages keyed by role.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineStages {
    pub prospect: PipelineStage,
    pub qualified: PipelineStage,
    pub proposal: PipelineStage,
    pub negotiation: PipelineStage,
    pub closed_won: PipelineStage,
}

impl PipelineStages {
    /// Stages in pipeline order, paired with their config key
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PipelineStage)> {
        [
            ("prospect", &self.prospect),
            ("qualified", &self.qualified),
            ("proposal", &self.proposal),
            ("negotiation", &self.negotiation),
            ("closed_won", &self.closed_won),
        ]
        .into_iter()
    }
}

impl Default for PipelineStages {
    fn default() -> Self {
        Self {
            prospect: PipelineStage::new(
                "Prospect",
                0.10,
                &["Initial Outreach", "Discovery Call", "Send Platform Overview"],
            ),
            qualified: PipelineStage::new(
                "Qualified Lead",
                0.25,
                &["Schedule Assessment", "Needs Analysis", "Stakeholder Mapping"],
            ),
            proposal: PipelineStage::new(
                "Proposal",
                0.50,
                &["Send Proposal", "Proposal Review Call", "Pricing Discussion"],
            ),
            negotiation: PipelineStage::new(
                "Negotiation",
                0.75,
                &["Contract Review", "Terms Negotiation", "Executive Sign-off"],
            ),
            closed_won: PipelineStage::new(
                "Closed Won",
                1.0,
                &["Onboarding Kickoff", "Account Handoff"],
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PipelineStage {
    pub name: String,
    /// Conversion probability (0-1)
    pub probability: f64,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl PipelineStage {
    pub fn new(name: &str, probability: f64, actions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            probability,
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityFactors {
    /// Workflow completions that make a lead engaged
    pub workflow_threshold: u32,
    /// Certificates above which a proposal is the next action
    pub certificate_threshold: u32,
    /// A login within this many days counts as recent activity
    pub recent_activity_days: i64,
    /// Trade volume above which a certified lead is hot
    pub high_volume_threshold: f64,
    /// Savings above which a lead earns the activity bonus
    pub high_savings_threshold: f64,
}

impl Default for PriorityFactors {
    fn default() -> Self {
        Self {
            workflow_threshold: 3,
            certificate_threshold: 2,
            recent_activity_days: 7,
            high_volume_threshold: 1_000_000.0,
            high_savings_threshold: 100_000.0,
        }
    }
}

/// Follow-up offsets from the last login.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FollowUpConfig {
    /// Leads with at least one certificate
    pub certified: String,
    /// Leads at or above the workflow threshold
    pub engaged: String,
    /// Everyone else
    pub default: String,
}

impl Default for FollowUpConfig {
    fn default() -> Self {
        Self {
            certified: "1d".to_string(),
            engaged: "2d".to_string(),
            default: "7d".to_string(),
        }
    }
}
