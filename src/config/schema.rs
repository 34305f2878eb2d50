use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::SalesConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub representative: Option<Representative>,
    /// Scoring overrides; stock values apply when omitted
    #[serde(default)]
    pub sales: Option<SalesConfig>,
    /// Lead export used when no `--leads` path is given
    #[serde(default)]
    pub leads: Option<PathBuf>,
}

impl Config {
    pub fn effective_sales(&self) -> SalesConfig {
        self.sales.clone().unwrap_or_default()
    }

    pub fn effective_representative(&self) -> Representative {
        self.representative.clone().unwrap_or_default()
    }
}

/// The sales representative who owns the pipeline
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Representative {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub territory: Option<String>,
}

impl Default for Representative {
    fn default() -> Self {
        Self {
            name: "Sales Representative".to_string(),
            email: None,
            territory: None,
        }
    }
}
