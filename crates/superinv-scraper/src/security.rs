//! Ticker and company-name resolution from free-text cells.
//!
//! Resolution runs an ordered chain of independent strategies and keeps the
//! first that matches:
//!
//! 1. [`dash_separated`]: `"RPRX - Royalty Pharma plc"`, or a bare ticker
//!    filling the whole field.
//! 2. [`standalone_token`]: the first whitespace-delimited token shaped like
//!    a ticker that is not a common English or legal-form word.
//!
//! A ticker directly followed by ` - ` is taken on shape alone, so `ALL -
//! Allstate Corp` resolves even though `ALL` is a stopword. Stopwords only
//! filter tokens that carry no dash.

use std::sync::LazyLock;

use regex::Regex;

/// A ticker is 2-6 characters: an uppercase letter, then letters or dots.
static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z.]{1,5}$").expect("valid ticker regex"));
static DASH_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Z][A-Z.]{1,5})\s*(?:-\s*(.*?))?\s*$").expect("valid dash field regex")
});
static DASH_SCAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)([A-Z][A-Z.]{1,5})\s*(-|$)").expect("valid dash scan regex")
});

/// Uppercase words that look like tickers but almost never are.
const STOPWORDS: &[&str] = &[
    "THE", "AND", "FOR", "ALL", "NEW", "ADD", "INC", "LLC", "LTD", "PLC", "CORP", "CO", "CL",
    "ADR", "BUY", "SELL", "USD", "OF",
];

/// A resolved security reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRef {
    pub ticker: String,
    pub company_name: Option<String>,
}

impl SecurityRef {
    /// Company name, or the ticker itself when none was found.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or(&self.ticker)
    }
}

type Strategy = fn(&str) -> Option<SecurityRef>;

const STRATEGIES: &[Strategy] = &[dash_separated, standalone_token];

/// Resolves a single security from `text`. Never fails; `None` means no
/// strategy matched.
#[must_use]
pub fn extract_security(text: &str) -> Option<SecurityRef> {
    STRATEGIES.iter().find_map(|strategy| strategy(text))
}

/// Returns `true` when `token` has ticker shape and is not a stopword.
#[must_use]
pub fn is_ticker(token: &str) -> bool {
    has_ticker_shape(token) && !STOPWORDS.contains(&token)
}

/// Shape check only: 2-6 characters, a leading uppercase letter, then
/// uppercase letters or dots.
#[must_use]
pub fn has_ticker_shape(token: &str) -> bool {
    TICKER_RE.is_match(token)
}

/// The whole field is `TICKER - Company Name`, or just `TICKER`.
#[must_use]
pub fn dash_separated(text: &str) -> Option<SecurityRef> {
    let cap = DASH_FIELD_RE.captures(text)?;
    let ticker = cap.get(1)?.as_str();
    let name = cap.get(2);
    // A bare field has no dash to vouch for it.
    if name.is_none() && !is_ticker(ticker) {
        return None;
    }
    let company_name = name
        .map(|m| m.as_str().trim().to_owned())
        .filter(|s| !s.is_empty());

    Some(SecurityRef {
        ticker: ticker.to_owned(),
        company_name,
    })
}

/// First ticker-shaped token; the company name is the longer neighbouring
/// token.
#[must_use]
pub fn standalone_token(text: &str) -> Option<SecurityRef> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (idx, ticker) = tokens.iter().enumerate().find(|(_, t)| is_ticker(t))?;

    let prev = idx.checked_sub(1).and_then(|i| tokens.get(i));
    let next = tokens.get(idx + 1);
    let company_name = match (prev, next) {
        (Some(p), Some(n)) => Some(if n.len() > p.len() { *n } else { *p }),
        (Some(p), None) => Some(*p),
        (None, Some(n)) => Some(*n),
        (None, None) => None,
    };

    Some(SecurityRef {
        ticker: (*ticker).to_owned(),
        company_name: company_name.map(str::to_owned),
    })
}

/// Collects up to `limit` tickers from a prose cell such as
/// `"RPRX - Royalty Pharma plc 4.60% GOOGL - Alphabet Inc. 3.20%"`.
///
/// Tickers followed by a dash (or ending the field) are preferred; when
/// there are none, every standalone ticker-shaped token is taken instead.
/// Document order is kept, repeats included.
#[must_use]
pub fn collect_tickers(text: &str, limit: usize) -> Vec<String> {
    let dashed: Vec<&str> = DASH_SCAN_RE
        .captures_iter(text)
        .filter_map(|cap| {
            let ticker = cap.get(1)?.as_str();
            let has_dash = cap.get(2).is_some_and(|m| m.as_str() == "-");
            let accepted = if has_dash {
                has_ticker_shape(ticker)
            } else {
                is_ticker(ticker)
            };
            accepted.then_some(ticker)
        })
        .collect();

    let candidates = if dashed.is_empty() {
        text.split_whitespace().filter(|t| is_ticker(t)).collect()
    } else {
        dashed
    };

    candidates
        .into_iter()
        .take(limit)
        .map(str::to_owned)
        .collect()
}
