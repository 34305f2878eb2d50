pub mod loader;
pub mod record;

pub use loader::load_leads;
pub use record::{LeadRecord, SubscriptionTier, TradeVolume};
