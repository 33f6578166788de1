use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::reconstruct::ReconstructionParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub investors_path: PathBuf,
    pub output_dir: PathBuf,
    pub source_base_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Pause between investors in batch mode.
    pub investor_cooldown_ms: u64,
    pub materiality_threshold_shares: u64,
    pub primary_floor_price: Decimal,
    pub fallback_share_price: Decimal,
}

impl AppConfig {
    /// Engine parameters carried by this configuration.
    #[must_use]
    pub fn reconstruction_params(&self) -> ReconstructionParams {
        ReconstructionParams {
            materiality_threshold_shares: self.materiality_threshold_shares,
            primary_floor_price: self.primary_floor_price,
            fallback_share_price: self.fallback_share_price,
        }
    }
}
