use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::ValueEnum;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::leads::LeadRecord;
use crate::scoring::{
    calculate_follow_up_date, determine_lead_status, determine_sales_stage, estimate_deal,
    get_next_sales_action, infer_industry, score_lead, DealEstimate, DealFallback, LeadStatus,
    SalesConfig, ScoreResult,
};

/// A lead enriched with everything the pipeline view shows
#[derive(Debug, Clone)]
pub struct PipelineEntry {
    pub id: Option<String>,
    pub company_name: String,
    pub email: Option<String>,
    pub industry: String,
    pub deal: DealEstimate,
    pub stage: String,
    pub score: ScoreResult,
    pub next_action: String,
    pub due_date: NaiveDate,
    pub status: LeadStatus,
}

impl PipelineEntry {
    pub fn probability(&self) -> u32 {
        self.score.probability
    }

    /// Deal size discounted by conversion probability
    pub fn weighted_value(&self) -> f64 {
        self.deal.fee as f64 * self.probability() as f64 / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PipelineFilter {
    #[default]
    All,
    /// Hot prospects only
    Hot,
    /// Follow-ups due this calendar month
    Closing,
    /// Follow-ups already past due
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PipelineSort {
    #[default]
    Probability,
    DealSize,
    DueDate,
    Company,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineSummary {
    pub leads: usize,
    pub total_value: u64,
    pub weighted_value: f64,
    pub by_status: BTreeMap<LeadStatus, usize>,
}

/// Enrich one lead record
pub fn enrich(record: &LeadRecord, config: &SalesConfig, as_of: DateTime<Utc>) -> PipelineEntry {
    let industry = record
        .industry
        .as_deref()
        .filter(|industry| !industry.trim().is_empty())
        .unwrap_or_else(|| infer_industry(record));

    PipelineEntry {
        id: record.id.clone(),
        company_name: record.display_name().to_string(),
        email: record.email.clone().filter(|email| !email.trim().is_empty()),
        industry: industry.to_string(),
        deal: estimate_deal(record, config),
        stage: determine_sales_stage(record, config, as_of).to_string(),
        score: score_lead(record, config, as_of),
        next_action: get_next_sales_action(record, config).to_string(),
        due_date: calculate_follow_up_date(record, config, as_of),
        status: determine_lead_status(record, config),
    }
}

/// Enrich every record, reporting the fallbacks the scoring functions
/// apply silently.
pub fn build_pipeline(
    records: &[LeadRecord],
    config: &SalesConfig,
    as_of: DateTime<Utc>,
) -> Vec<PipelineEntry> {
    let entries: Vec<PipelineEntry> = records
        .iter()
        .map(|record| {
            let entry = enrich(record, config, as_of);
            if let Some(DealFallback::Unparseable(ref e)) = entry.deal.fallback {
                tracing::warn!(
                    company = %entry.company_name,
                    error = %e,
                    "unreadable trade volume, using minimum fee"
                );
            }
            if record.has_invalid_last_login() {
                tracing::warn!(
                    company = %entry.company_name,
                    last_login = record.last_login.as_deref().unwrap_or_default(),
                    "unreadable last login, treating as never logged in"
                );
            }
            entry
        })
        .collect();

    tracing::debug!(count = entries.len(), %as_of, "built pipeline");
    entries
}

pub fn filter_entries(
    entries: Vec<PipelineEntry>,
    filter: PipelineFilter,
    as_of: DateTime<Utc>,
) -> Vec<PipelineEntry> {
    let today = as_of.date_naive();
    entries
        .into_iter()
        .filter(|entry| match filter {
            PipelineFilter::All => true,
            PipelineFilter::Hot => entry.status == LeadStatus::Hot,
            PipelineFilter::Closing => {
                entry.due_date.year() == today.year() && entry.due_date.month() == today.month()
            }
            PipelineFilter::Overdue => entry.due_date < today,
        })
        .collect()
}

/// Sort entries in place. Ties fall back to deal size (largest first),
/// then company name.
pub fn sort_entries(entries: &mut [PipelineEntry], sort: PipelineSort) {
    entries.sort_by(|a, b| {
        let primary = match sort {
            PipelineSort::Probability => b.probability().cmp(&a.probability()),
            PipelineSort::DealSize => b.deal.fee.cmp(&a.deal.fee),
            PipelineSort::DueDate => a.due_date.cmp(&b.due_date),
            PipelineSort::Company => compare_names(a, b),
        };
        primary
            .then_with(|| b.deal.fee.cmp(&a.deal.fee))
            .then_with(|| compare_names(a, b))
    });
}

fn compare_names(a: &PipelineEntry, b: &PipelineEntry) -> Ordering {
    a.company_name
        .to_lowercase()
        .cmp(&b.company_name.to_lowercase())
}

pub fn summarize(entries: &[PipelineEntry]) -> PipelineSummary {
    let mut summary = PipelineSummary {
        leads: entries.len(),
        ..Default::default()
    };
    for entry in entries {
        summary.total_value = summary.total_value.saturating_add(entry.deal.fee);
        summary.weighted_value += entry.weighted_value();
        *summary.by_status.entry(entry.status).or_insert(0) += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::TradeVolume;
    use chrono::TimeZone;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn lead(name: &str, volume: &str, certificates: u32, completions: u32, login: &str) -> LeadRecord {
        LeadRecord {
            company_name: Some(name.to_string()),
            trade_volume: Some(TradeVolume::Text(volume.to_string())),
            certificates_generated: Some(certificates),
            workflow_completions: Some(completions),
            last_login: Some(login.to_string()),
            ..Default::default()
        }
    }

    fn sample() -> Vec<LeadRecord> {
        vec![
            // Hot: certified, 12M volume, logged in this week
            lead("Acme Electronics", "$12,000,000", 1, 4, "2024-03-14"),
            // Warm: engaged, login long ago
            lead("Globex", "$2,000,000", 0, 3, "2024-01-01"),
            // Cold: nothing
            lead("Initech", "$50,000", 0, 0, "2024-03-20"),
        ]
    }

    #[test]
    fn test_enrich_fills_every_column() {
        let config = SalesConfig::default();
        let record = LeadRecord {
            business_type: Some("textile mill".to_string()),
            trade_volume: Some(TradeVolume::Text("$12,000,000".to_string())),
            certificates_generated: Some(3),
            total_savings: Some(250_000.0),
            last_login: Some("2024-03-14".to_string()),
            email: Some("  ".to_string()),
            ..Default::default()
        };
        let entry = enrich(&record, &config, as_of());

        assert_eq!(entry.company_name, "Unknown Company");
        assert_eq!(entry.industry, "Textiles");
        assert!(entry.email.is_none());
        assert_eq!(entry.deal.fee, 960_000);
        assert_eq!(entry.stage, "Qualified Lead");
        // 10 + 20 (certificates) + 15 (savings) + 15 (login)
        assert_eq!(entry.probability(), 60);
        assert_eq!(entry.next_action, "Send Proposal");
        assert_eq!(entry.due_date.to_string(), "2024-03-15");
        assert_eq!(entry.status, LeadStatus::Hot);
    }

    #[test]
    fn test_explicit_industry_wins() {
        let config = SalesConfig::default();
        let record = LeadRecord {
            industry: Some("Aerospace".to_string()),
            business_type: Some("automotive".to_string()),
            ..Default::default()
        };
        assert_eq!(enrich(&record, &config, as_of()).industry, "Aerospace");
    }

    #[test]
    fn test_filter_hot() {
        let config = SalesConfig::default();
        let entries = build_pipeline(&sample(), &config, as_of());
        let hot = filter_entries(entries, PipelineFilter::Hot, as_of());
        assert_eq!(hot.len(), 1);
        assert_eq!(hot[0].company_name, "Acme Electronics");
    }

    #[test]
    fn test_filter_overdue_and_closing() {
        let config = SalesConfig::default();
        let entries = build_pipeline(&sample(), &config, as_of());

        // Globex: 2024-01-01 + 2d, long overdue
        let overdue = filter_entries(entries.clone(), PipelineFilter::Overdue, as_of());
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].company_name, "Globex");

        // Acme due 03-15, Initech due 03-27
        let closing = filter_entries(entries, PipelineFilter::Closing, as_of());
        let names: Vec<_> = closing.iter().map(|e| e.company_name.as_str()).collect();
        assert_eq!(names, vec!["Acme Electronics", "Initech"]);
    }

    #[test]
    fn test_sort_by_probability() {
        let config = SalesConfig::default();
        let mut entries = build_pipeline(&sample(), &config, as_of());
        sort_entries(&mut entries, PipelineSort::Probability);
        let names: Vec<_> = entries.iter().map(|e| e.company_name.as_str()).collect();
        assert_eq!(names, vec!["Acme Electronics", "Globex", "Initech"]);
    }

    #[test]
    fn test_sort_by_due_date() {
        let config = SalesConfig::default();
        let mut entries = build_pipeline(&sample(), &config, as_of());
        sort_entries(&mut entries, PipelineSort::DueDate);
        let names: Vec<_> = entries.iter().map(|e| e.company_name.as_str()).collect();
        assert_eq!(names, vec!["Globex", "Acme Electronics", "Initech"]);
    }

    #[test]
    fn test_sort_ties_use_deal_size_then_name() {
        let config = SalesConfig::default();
        let records = vec![
            lead("beta", "$50,000", 0, 0, "2020-01-01"),
            lead("Alpha", "$50,000", 0, 0, "2020-01-01"),
            lead("Gamma", "$5,000,000", 0, 0, "2020-01-01"),
        ];
        let mut entries = build_pipeline(&records, &config, as_of());
        sort_entries(&mut entries, PipelineSort::Probability);
        let names: Vec<_> = entries.iter().map(|e| e.company_name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha", "beta"]);
    }

    #[test]
    fn test_summary() {
        let config = SalesConfig::default();
        let entries = build_pipeline(&sample(), &config, as_of());
        let summary = summarize(&entries);

        assert_eq!(summary.leads, 3);
        // 960000 + 100000 + 15000
        assert_eq!(summary.total_value, 1_075_000);
        assert_eq!(summary.by_status.get(&LeadStatus::Hot), Some(&1));
        assert_eq!(summary.by_status.get(&LeadStatus::Warm), Some(&1));
        assert_eq!(summary.by_status.get(&LeadStatus::Cold), Some(&1));
        let expected: f64 = entries.iter().map(|e| e.weighted_value()).sum();
        assert!((summary.weighted_value - expected).abs() < 1e-6);
    }

    #[test]
    fn test_summary_saturates_on_huge_deals() {
        let config = SalesConfig::default();
        let huge = LeadRecord {
            trade_volume: Some(TradeVolume::Amount(1e300)),
            ..Default::default()
        };
        let entries = build_pipeline(&[huge.clone(), huge], &config, as_of());
        assert_eq!(entries[0].deal.fee, u64::MAX);

        let summary = summarize(&entries);
        assert_eq!(summary.leads, 2);
        assert_eq!(summary.total_value, u64::MAX);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert_eq!(summary.leads, 0);
        assert_eq!(summary.total_value, 0);
        assert!(summary.by_status.is_empty());
    }
}
