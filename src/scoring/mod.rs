pub mod config;
pub mod currency;
pub mod deal;
pub mod engine;
pub mod stage;
pub mod validation;

pub use config::*;
pub use currency::{format_currency, parse_currency, CurrencyError};
pub use deal::{calculate_deal_size, estimate_deal, DealEstimate, DealFallback};
pub use engine::{calculate_sales_probability, score_lead, FactorContribution, ScoreBreakdown, ScoreResult};
pub use stage::{
    calculate_follow_up_date, determine_lead_status, determine_sales_stage, get_next_sales_action,
    infer_industry, LeadStatus,
};
pub use validation::validate_sales_config;
