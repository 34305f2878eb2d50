use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CurrencyError {
    Empty,
    Invalid { input: String },
    NonFinite { input: String },
}

impl fmt::Display for CurrencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyError::Empty => write!(f, "empty currency amount"),
            CurrencyError::Invalid { input } => {
                write!(f, "'{}' is not a currency amount", input)
            }
            CurrencyError::NonFinite { input } => {
                write!(f, "'{}' is not a finite amount", input)
            }
        }
    }
}

impl std::error::Error for CurrencyError {}

/// Parse a dashboard currency string such as "$1,000,000" into a number.
///
/// Dollar signs and thousands separators are stripped before parsing.
/// Trailing text ("1.5M", "100 USD") and exponent notation ("1e300") are
/// rejected rather than truncated.
pub fn parse_currency(input: &str) -> Result<f64, CurrencyError> {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(CurrencyError::Empty);
    }

    let value: f64 = cleaned.parse().map_err(|_| CurrencyError::Invalid {
        input: input.to_string(),
    })?;

    if !value.is_finite() {
        return Err(CurrencyError::NonFinite {
            input: input.to_string(),
        });
    }

    // Dashboards never write amounts in exponent notation
    if cleaned.contains(['e', 'E']) {
        return Err(CurrencyError::Invalid {
            input: input.to_string(),
        });
    }

    Ok(value)
}

/// Format an amount in compact dashboard notation ($1.2M, $15K, $500)
pub fn format_currency(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("${:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("${:.0}K", amount / 1_000.0)
    } else {
        format!("${}", amount)
    }
}
