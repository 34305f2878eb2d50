use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use super::record::{LeadRecord, TradeVolume};

/// JSON exports are either a bare array or the users endpoint envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum LeadExport {
    List(Vec<LeadRecord>),
    Users { users: Vec<LeadRecord> },
}

/// CSV rows keep trade volume as text so "$1,000,000" survives intact
#[derive(Deserialize)]
struct CsvLeadRow {
    id: Option<String>,
    company_name: Option<String>,
    email: Option<String>,
    industry: Option<String>,
    business_type: Option<String>,
    product_description: Option<String>,
    trade_volume: Option<String>,
    workflow_completions: Option<u32>,
    certificates_generated: Option<u32>,
    last_login: Option<String>,
    subscription_tier: Option<String>,
    total_savings: Option<f64>,
}

impl From<CsvLeadRow> for LeadRecord {
    fn from(row: CsvLeadRow) -> Self {
        LeadRecord {
            id: row.id,
            company_name: row.company_name,
            email: row.email,
            industry: row.industry,
            business_type: row.business_type,
            product_description: row.product_description,
            trade_volume: row.trade_volume.map(TradeVolume::Text),
            workflow_completions: row.workflow_completions,
            certificates_generated: row.certificates_generated,
            last_login: row.last_login,
            subscription_tier: row.subscription_tier,
            total_savings: row.total_savings,
        }
    }
}

/// Load lead records from a `.json` or `.csv` export
pub fn load_leads(path: &Path) -> Result<Vec<LeadRecord>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let records = match extension.as_deref() {
        Some("json") => load_json(path)?,
        Some("csv") => load_csv(path)?,
        _ => bail!(
            "Unsupported lead file {}: expected a .json or .csv export",
            path.display()
        ),
    };

    tracing::debug!(count = records.len(), path = %path.display(), "loaded lead records");
    Ok(records)
}

fn load_json(path: &Path) -> Result<Vec<LeadRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open lead file at {}", path.display()))?;
    let export: LeadExport = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse lead records in {}", path.display()))?;

    Ok(match export {
        LeadExport::List(records) => records,
        LeadExport::Users { users } => users,
    })
}

fn load_csv(path: &Path) -> Result<Vec<LeadRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open lead file at {}", path.display()))?;

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<CsvLeadRow>().enumerate() {
        // +2: header line and 1-based numbering
        let row = row.with_context(|| {
            format!("Failed to parse row {} of {}", i + 2, path.display())
        })?;
        records.push(row.into());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_json_array() {
        let path = write_temp(
            "triangle_pipeline_test_array.json",
            r#"[{"company_name": "Acme", "workflow_completions": 3}]"#,
        );
        let records = load_leads(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].workflow_completions(), 3);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_json_users_envelope() {
        let path = write_temp(
            "triangle_pipeline_test_envelope.json",
            r#"{"users": [{"company_name": "Acme"}, {"company_name": "Globex"}]}"#,
        );
        let records = load_leads(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].display_name(), "Globex");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_csv() {
        let path = write_temp(
            "triangle_pipeline_test_leads.csv",
            "id,company_name,email,industry,business_type,product_description,trade_volume,workflow_completions,certificates_generated,last_login,subscription_tier,total_savings\n\
             1,Acme,ops@acme.test,,electronics,,\"$12,000,000\",4,1,2024-01-01,enterprise,250000\n\
             2,Globex,,,,,,,,,,\n",
        );
        let records = load_leads(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].trade_volume().unwrap().unwrap(), 12_000_000.0);
        assert_eq!(records[0].certificates_generated(), 1);
        assert_eq!(records[0].total_savings(), 250_000.0);
        assert!(records[1].trade_volume().is_none());
        assert_eq!(records[1].workflow_completions(), 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = write_temp("triangle_pipeline_test_leads.txt", "nothing");
        let err = load_leads(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported lead file"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let path = env::temp_dir().join("triangle_pipeline_test_missing.json");
        let _ = std::fs::remove_file(&path);
        assert!(load_leads(&path).is_err());
    }

    #[test]
    fn test_invalid_json() {
        let path = write_temp("triangle_pipeline_test_invalid.json", "{not json");
        let err = load_leads(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse lead records"));
        let _ = std::fs::remove_file(&path);
    }
}
