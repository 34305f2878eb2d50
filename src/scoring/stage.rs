use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::time::Duration;

use super::config::SalesConfig;
use crate::leads::LeadRecord;

const ACTIVE_USER: &str = "Active User";
const PLATFORM_USER: &str = "Platform User";
const NEW_REGISTRATION: &str = "New Registration";

const SEND_PROPOSAL: &str = "Send Proposal";
const SCHEDULE_ASSESSMENT: &str = "Schedule Assessment";
const FOLLOW_UP_CALL: &str = "Follow-up Call";
const INITIAL_OUTREACH: &str = "Initial Outreach";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeadStatus {
    Hot,
    Warm,
    Qualified,
    Cold,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Hot => "hot",
            LeadStatus::Warm => "warm",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Cold => "cold",
        }
    }

    pub fn all() -> [LeadStatus; 4] {
        [
            LeadStatus::Hot,
            LeadStatus::Warm,
            LeadStatus::Qualified,
            LeadStatus::Cold,
        ]
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_recent(record: &LeadRecord, config: &SalesConfig, as_of: DateTime<Utc>) -> bool {
    record
        .days_since_login(as_of)
        .is_some_and(|days| days <= config.priority_factors.recent_activity_days)
}

/// Pipeline stage label for a lead
pub fn determine_sales_stage<'a>(
    record: &LeadRecord,
    config: &'a SalesConfig,
    as_of: DateTime<Utc>,
) -> &'a str {
    let completions = record.workflow_completions();
    let stages = &config.pipeline_stages;

    if record.certificates_generated() > 0 {
        return &stages.qualified.name;
    }
    if completions >= config.priority_factors.workflow_threshold {
        return &stages.prospect.name;
    }
    if completions >= 1 && is_recent(record, config, as_of) {
        return ACTIVE_USER;
    }
    if completions >= 1 {
        return PLATFORM_USER;
    }
    NEW_REGISTRATION
}

/// Recommended next action for a lead
pub fn get_next_sales_action<'a>(record: &LeadRecord, config: &'a SalesConfig) -> &'a str {
    let completions = record.workflow_completions();
    let factors = &config.priority_factors;

    if record.certificates_generated() > factors.certificate_threshold {
        return config
            .pipeline_stages
            .proposal
            .actions
            .first()
            .map(String::as_str)
            .unwrap_or(SEND_PROPOSAL);
    }
    if completions >= factors.workflow_threshold {
        return SCHEDULE_ASSESSMENT;
    }
    if completions >= 1 {
        return FOLLOW_UP_CALL;
    }
    INITIAL_OUTREACH
}

pub fn determine_lead_status(record: &LeadRecord, config: &SalesConfig) -> LeadStatus {
    let completions = record.workflow_completions();
    let factors = &config.priority_factors;
    let volume = record
        .trade_volume()
        .and_then(Result::ok)
        .unwrap_or(0.0);

    if record.certificates_generated() > 0
        && (record.total_savings() > factors.high_savings_threshold
            || volume > factors.high_volume_threshold)
    {
        return LeadStatus::Hot;
    }
    if completions >= factors.workflow_threshold {
        return LeadStatus::Warm;
    }
    if completions >= 1 {
        return LeadStatus::Qualified;
    }
    LeadStatus::Cold
}

/// Next follow-up date: last login (or `as_of` when unknown) plus an
/// offset chosen by engagement.
pub fn calculate_follow_up_date(
    record: &LeadRecord,
    config: &SalesConfig,
    as_of: DateTime<Utc>,
) -> NaiveDate {
    let base = record.last_login_at().unwrap_or(as_of);
    let offset = follow_up_offset(record, config);
    let offset = chrono::Duration::from_std(offset).unwrap_or(chrono::Duration::zero());
    // Dates near chrono's limit keep the base date rather than overflow
    base.checked_add_signed(offset).unwrap_or(base).date_naive()
}

/// Offset for the lead's engagement level. Unparseable config values fall
/// back to the stock 1/2/7 days.
pub fn follow_up_offset(record: &LeadRecord, config: &SalesConfig) -> Duration {
    let follow_up = &config.follow_up;
    let (value, fallback_days) = if record.certificates_generated() > 0 {
        (&follow_up.certified, 1)
    } else if record.workflow_completions() >= config.priority_factors.workflow_threshold {
        (&follow_up.engaged, 2)
    } else {
        (&follow_up.default, 7)
    };

    humantime::parse_duration(value.trim())
        .unwrap_or_else(|_| Duration::from_secs(fallback_days * 86_400))
}

/// Industry guess from the free-text business fields
pub fn infer_industry(record: &LeadRecord) -> &'static str {
    let business_type = record
        .business_type
        .as_deref()
        .unwrap_or("")
        .to_lowercase();
    let product = record
        .product_description
        .as_deref()
        .unwrap_or("")
        .to_lowercase();
    let mentions = |needle: &str| business_type.contains(needle) || product.contains(needle);

    if mentions("electronic") {
        "Electronics"
    } else if mentions("auto") {
        "Automotive"
    } else if mentions("textile") {
        "Textiles"
    } else {
        "General Manufacturing"
    }
}
