use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// -----------------------------------------------------------------------
// parse_lenient_number
// -----------------------------------------------------------------------

#[test]
fn lenient_number_strips_currency_and_thousands() {
    assert_eq!(parse_lenient_number("$1,234,567.89"), Ok(dec("1234567.89")));
    assert_eq!(parse_lenient_number("  12,000 shares "), Ok(dec("12000")));
}

#[test]
fn lenient_number_keeps_sign() {
    assert_eq!(parse_lenient_number("-1,500"), Ok(dec("-1500")));
}

#[test]
fn lenient_number_takes_leading_numeric_prefix() {
    assert_eq!(parse_lenient_number("1.2.3"), Ok(dec("1.2")));
    assert_eq!(parse_lenient_number("12-5"), Ok(dec("12")));
    assert_eq!(parse_lenient_number("7."), Ok(dec("7")));
    assert_eq!(parse_lenient_number(".5"), Ok(dec("0.5")));
}

#[test]
fn lenient_number_distinguishes_zero_from_garbage() {
    assert_eq!(parse_lenient_number("0"), Ok(Decimal::ZERO));
    assert!(parse_lenient_number("").is_err());
    assert!(parse_lenient_number("n/a").is_err());
    assert!(parse_lenient_number("-").is_err());
    assert_eq!(lenient_number("n/a"), Decimal::ZERO);
}

#[test]
fn lenient_number_percent_cell() {
    assert_eq!(lenient_number("0.52%"), dec("0.52"));
}

// -----------------------------------------------------------------------
// parse_magnitude_value
// -----------------------------------------------------------------------

#[test]
fn magnitude_value_scales_by_suffix() {
    assert_eq!(parse_magnitude_value("$2.71 B"), Ok(dec("2710000000")));
    assert_eq!(parse_magnitude_value("$350.5M"), Ok(dec("350500000")));
    assert_eq!(parse_magnitude_value("12k"), Ok(dec("12000")));
}

#[test]
fn magnitude_value_without_suffix_is_literal() {
    assert_eq!(parse_magnitude_value("$1,234"), Ok(dec("1234")));
}

#[test]
fn magnitude_value_of_zero_is_zero() {
    assert_eq!(parse_magnitude_value("$0 B"), Ok(Decimal::ZERO));
}

#[test]
fn magnitude_value_unparseable_collapses_to_zero() {
    assert!(parse_magnitude_value("Billions").is_err());
    assert_eq!(magnitude_value("Billions"), Decimal::ZERO);
}

// -----------------------------------------------------------------------
// parse_percent
// -----------------------------------------------------------------------

#[test]
fn percent_finds_first_percentage() {
    assert_eq!(parse_percent("Reduce 19.47%"), Ok(dec("19.47")));
    assert_eq!(parse_percent("Add 5 %"), Ok(dec("5")));
    assert!(parse_percent("Buy").is_err());
}

// -----------------------------------------------------------------------
// quarter labels
// -----------------------------------------------------------------------

#[test]
fn quarter_label_year_first() {
    let period = quarter_label_to_period("2024 Q4").unwrap();
    assert_eq!(period.key(), "2024-Q4");
    assert_eq!(quarter_label_to_date("2024 Q4"), Some(date(2024, 12, 31)));
}

#[test]
fn quarter_label_quarter_first() {
    assert_eq!(quarter_label_to_period("Q1 2025").unwrap().key(), "2025-Q1");
    assert_eq!(quarter_label_to_date("Q2 2023"), Some(date(2023, 6, 30)));
}

#[test]
fn quarter_label_embedded_in_text() {
    assert_eq!(
        quarter_label_to_period("Period: Q3 2019").unwrap().key(),
        "2019-Q3"
    );
    assert_eq!(quarter_label_to_period("2020Q2").unwrap().key(), "2020-Q2");
}

#[test]
fn quarter_label_rejects_missing_or_invalid_quarter() {
    assert!(quarter_label_to_period("Q5 2024").is_err());
    assert!(quarter_label_to_period("Portfolio value").is_err());
    assert_eq!(quarter_label_to_date(""), None);
}

#[test]
fn quarter_label_round_trips_through_formatter() {
    for year in [1999, 2008, 2015, 2024, 2031] {
        for quarter in 1..=4 {
            let period = QuarterPeriod::new(year, quarter).unwrap();
            let label = quarter_label(period);
            assert_eq!(quarter_label_to_period(&label), Ok(period), "label {label}");
            assert_eq!(quarter_label_to_date(&label), Some(period.end_date()));
        }
    }
}

// -----------------------------------------------------------------------
// parse_loose_date
// -----------------------------------------------------------------------

#[test]
fn loose_date_day_month_assumes_current_year() {
    let today = date(2025, 3, 1);
    assert_eq!(
        parse_loose_date("14 Feb", today),
        LooseDate::Parsed(date(2025, 2, 14))
    );
}

#[test]
fn loose_date_day_month_year() {
    let today = date(2025, 3, 1);
    assert_eq!(
        parse_loose_date("31 Dec 2024", today),
        LooseDate::Parsed(date(2024, 12, 31))
    );
    assert_eq!(
        parse_loose_date("5 September, 2023", today),
        LooseDate::Parsed(date(2023, 9, 5))
    );
}

#[test]
fn loose_date_us_slash_format() {
    let today = date(2025, 3, 1);
    assert_eq!(
        parse_loose_date("2/7/2025", today),
        LooseDate::Parsed(date(2025, 2, 7))
    );
}

#[test]
fn loose_date_iso_passthrough() {
    let today = date(2025, 3, 1);
    assert_eq!(
        parse_loose_date(" 2024-11-05 ", today),
        LooseDate::Parsed(date(2024, 11, 5))
    );
}

#[test]
fn loose_date_falls_back_to_today() {
    let today = date(2025, 3, 1);
    let parsed = parse_loose_date("yesterday", today);
    assert!(parsed.is_fallback());
    assert_eq!(parsed.date(), today);
    assert!(try_parse_loose_date("yesterday", today).is_err());
}

#[test]
fn loose_date_impossible_calendar_date_falls_back() {
    let today = date(2025, 3, 1);
    assert!(parse_loose_date("31 Feb 2024", today).is_fallback());
    assert!(parse_loose_date("13/1/2024", today).is_fallback());
}

#[test]
fn loose_date_month_must_be_a_real_name_or_abbreviation() {
    let today = date(2025, 3, 1);
    assert!(parse_loose_date("14 Febxyz", today).is_fallback());
    assert!(parse_loose_date("3 Marchy 2024", today).is_fallback());
    assert_eq!(
        parse_loose_date("9 Sept. 2024", today),
        LooseDate::Parsed(date(2024, 9, 9))
    );
    assert_eq!(
        parse_loose_date("1 MAY 2024", today),
        LooseDate::Parsed(date(2024, 5, 1))
    );
}
