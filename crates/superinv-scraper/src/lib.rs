pub mod activity;
pub mod client;
pub mod error;
pub mod holdings;
pub mod html;
pub mod normalize;
pub mod realtime;
pub mod security;
pub mod trend;

pub use activity::{classify_activity, extract_activity, extract_activity_rows, ActivityCursor};
pub use client::{SourceClient, SourcePage};
pub use error::ScraperError;
pub use holdings::{extract_current_holdings, CurrentHoldings, PeriodSource};
pub use normalize::{
    lenient_number, magnitude_value, parse_lenient_number, parse_loose_date,
    parse_magnitude_value, quarter_label, quarter_label_to_date, quarter_label_to_period,
    LooseDate, Unparsed,
};
pub use realtime::normalize_realtime;
pub use security::{collect_tickers, extract_security, SecurityRef};
pub use trend::{extract_trend, extract_trend_rows};
