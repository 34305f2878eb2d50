pub mod browser;
pub mod config;
pub mod leads;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod telemetry;
