pub mod app_config;
mod config;
pub mod holdings;
pub mod investors;
pub mod period;
pub mod realtime;
pub mod reconstruct;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use holdings::{
    pseudo_identifier, ActivityEvent, ActivityKind, QuarterlySnapshot, ReconstructedPosition,
    TrendObservation, MAX_TOP_TICKERS,
};
pub use investors::{load_investors, parse_investors, InvestorConfig, InvestorsFile};
pub use period::{InvalidQuarterKey, QuarterPeriod};
pub use realtime::{RealtimeActivity, RealtimeKind};
pub use reconstruct::{
    reconstruct_all, reconstruct_quarter, ReconstructionParams, ValuationPath,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read investors file {path}: {source}")]
    InvestorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse investors file: {0}")]
    InvestorsFileParse(#[source] serde_yaml::Error),

    #[error("investor configuration is invalid: {0}")]
    Validation(String),
}
