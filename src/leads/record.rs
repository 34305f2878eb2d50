use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::currency::{parse_currency, CurrencyError};

/// A platform user as exported by the admin users endpoint.
///
/// Every field is optional; missing signals count as zero.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct LeadRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "companyName")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default, alias = "businessType")]
    pub business_type: Option<String>,
    #[serde(default, alias = "productDescription")]
    pub product_description: Option<String>,
    #[serde(default, alias = "tradeVolume")]
    pub trade_volume: Option<TradeVolume>,
    #[serde(default, alias = "workflowCompletions")]
    pub workflow_completions: Option<u32>,
    #[serde(default, alias = "certificatesGenerated")]
    pub certificates_generated: Option<u32>,
    #[serde(default, alias = "lastLogin")]
    pub last_login: Option<String>,
    #[serde(default, alias = "subscriptionTier")]
    pub subscription_tier: Option<String>,
    #[serde(default, alias = "totalSavings")]
    pub total_savings: Option<f64>,
}

/// Trade volume arrives either as a number or a formatted string ("$1,000,000")
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum TradeVolume {
    Amount(f64),
    Text(String),
}

impl TradeVolume {
    pub fn amount(&self) -> Result<f64, CurrencyError> {
        match self {
            TradeVolume::Amount(value) if value.is_finite() => Ok(*value),
            TradeVolume::Amount(value) => Err(CurrencyError::NonFinite {
                input: value.to_string(),
            }),
            TradeVolume::Text(text) => parse_currency(text),
        }
    }

    /// Zero and empty values are treated as absent
    fn is_blank(&self) -> bool {
        match self {
            TradeVolume::Amount(value) => *value == 0.0,
            TradeVolume::Text(text) => text.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionTier {
    Enterprise,
    Professional,
    Basic,
    None,
}

impl LeadRecord {
    pub fn workflow_completions(&self) -> u32 {
        self.workflow_completions.unwrap_or(0)
    }

    pub fn certificates_generated(&self) -> u32 {
        self.certificates_generated.unwrap_or(0)
    }

    pub fn total_savings(&self) -> f64 {
        self.total_savings.filter(|s| s.is_finite()).unwrap_or(0.0)
    }

    /// Trade volume if present. `Some(Err)` means a value was supplied but
    /// could not be read.
    pub fn trade_volume(&self) -> Option<Result<f64, CurrencyError>> {
        self.trade_volume
            .as_ref()
            .filter(|volume| !volume.is_blank())
            .map(TradeVolume::amount)
    }

    /// Tier names are matched exactly; anything unrecognised earns no bonus
    pub fn subscription_tier(&self) -> SubscriptionTier {
        match self.subscription_tier.as_deref() {
            Some("enterprise") => SubscriptionTier::Enterprise,
            Some("professional") => SubscriptionTier::Professional,
            Some("basic") => SubscriptionTier::Basic,
            _ => SubscriptionTier::None,
        }
    }

    /// Last login as an instant. Accepts RFC 3339 timestamps, naive
    /// timestamps (taken as UTC) and bare dates (midnight UTC).
    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_login.as_deref()?.trim();
        parse_timestamp(raw)
    }

    /// True when a login value is present but unreadable
    pub fn has_invalid_last_login(&self) -> bool {
        self.last_login
            .as_deref()
            .is_some_and(|raw| !raw.trim().is_empty() && parse_timestamp(raw.trim()).is_none())
    }

    /// Whole days between the last login and `as_of`, rounded down.
    pub fn days_since_login(&self, as_of: DateTime<Utc>) -> Option<i64> {
        let login = self.last_login_at()?;
        Some((as_of - login).num_seconds().div_euclid(86_400))
    }

    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("Unknown Company")
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
