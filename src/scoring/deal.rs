use super::config::SalesConfig;
use super::currency::CurrencyError;
use crate::leads::LeadRecord;

/// Why a deal estimate fell back to the terminal tier's minimum fee
#[derive(Debug, Clone, PartialEq)]
pub enum DealFallback {
    /// No trade volume on the record (absent, empty or zero)
    Missing,
    /// A trade volume was supplied but could not be parsed
    Unparseable(CurrencyError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DealEstimate {
    pub fee: u64,
    /// Name of the tier that produced the fee
    pub tier: Option<String>,
    pub volume: Option<f64>,
    pub fallback: Option<DealFallback>,
}

impl DealEstimate {
    /// True when the fee did not come from a readable trade volume
    pub fn incomplete(&self) -> bool {
        matches!(self.fallback, Some(DealFallback::Unparseable(_)))
    }
}

/// Estimated fee for a lead's trade volume.
///
/// Unreadable volumes resolve to the terminal tier's minimum fee;
/// use [`estimate_deal`] to see whether that happened.
pub fn calculate_deal_size(record: &LeadRecord, config: &SalesConfig) -> u64 {
    estimate_deal(record, config).fee
}

pub fn estimate_deal(record: &LeadRecord, config: &SalesConfig) -> DealEstimate {
    match record.trade_volume() {
        None => minimum_fee_estimate(config, None, DealFallback::Missing),
        Some(Err(e)) => minimum_fee_estimate(config, None, DealFallback::Unparseable(e)),
        Some(Ok(volume)) => estimate_for_volume(volume, config),
    }
}

/// Tiered fee for a known volume. Tiers are checked in configured order
/// and the first with `volume >= threshold` wins.
pub fn estimate_for_volume(volume: f64, config: &SalesConfig) -> DealEstimate {
    for tier in &config.deal_tiers {
        if volume >= tier.threshold {
            return DealEstimate {
                fee: tier.fee_for(volume),
                tier: Some(tier.name.clone()),
                volume: Some(volume),
                fallback: None,
            };
        }
    }

    // Negative volumes match no tier
    let terminal = config.terminal_tier();
    DealEstimate {
        fee: terminal.map(|t| t.minimum_fee).unwrap_or(0),
        tier: terminal.map(|t| t.name.clone()),
        volume: Some(volume),
        fallback: None,
    }
}

fn minimum_fee_estimate(
    config: &SalesConfig,
    volume: Option<f64>,
    fallback: DealFallback,
) -> DealEstimate {
    let terminal = config.terminal_tier();
    DealEstimate {
        fee: terminal.map(|t| t.minimum_fee).unwrap_or(0),
        tier: terminal.map(|t| t.name.clone()),
        volume,
        fallback: Some(fallback),
    }
}
