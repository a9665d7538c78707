use bookwise_core::time::{self, TimeOfDay};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("00:00", 0)]
#[case("09:00", 540)]
#[case("9:05", 545)]
#[case("12:30", 750)]
#[case("23:59", 1439)]
#[case("09:00:00", 540)]
#[case("09:00:59", 540)]
fn test_parse_accepts_valid_times(#[case] input: &str, #[case] expected_minutes: u16) {
    let parsed = TimeOfDay::parse(input).expect("time should parse");
    assert_eq!(parsed.minutes(), expected_minutes);
}

#[rstest]
#[case("24:00")]
#[case("09:60")]
#[case("0900")]
#[case("09")]
#[case("09:00:60")]
#[case("09:00:00:00")]
#[case("")]
#[case("aa:bb")]
#[case("-1:00")]
#[case("09:-5")]
fn test_parse_rejects_malformed_times(#[case] input: &str) {
    assert!(TimeOfDay::parse(input).is_err(), "{input:?} should be rejected");
}

#[test]
fn test_display_is_zero_padded() {
    assert_eq!(TimeOfDay::parse("9:05").unwrap().to_string(), "09:05");
    assert_eq!(TimeOfDay::MIDNIGHT.to_string(), "00:00");
    assert_eq!(TimeOfDay::parse("23:59").unwrap().to_string(), "23:59");
}

#[test]
fn test_ordering_matches_clock_order() {
    let morning = TimeOfDay::parse("09:00").unwrap();
    let noon = TimeOfDay::parse("12:00").unwrap();
    let evening = TimeOfDay::parse("18:30").unwrap();

    assert!(morning < noon);
    assert!(noon < evening);

    // Zero-padded formatting means string sort equals clock sort
    let mut formatted = vec![evening.to_string(), morning.to_string(), noon.to_string()];
    formatted.sort();
    assert_eq!(formatted, vec!["09:00", "12:00", "18:30"]);
}

#[test]
fn test_add_minutes() {
    let start = TimeOfDay::parse("09:00").unwrap();
    assert_eq!(start.add_minutes(60), Some(TimeOfDay::parse("10:00").unwrap()));
    assert_eq!(start.add_minutes(0), Some(start));

    // Durations crossing midnight do not produce a time
    let late = TimeOfDay::parse("23:30").unwrap();
    assert_eq!(late.add_minutes(60), None);
    assert_eq!(TimeOfDay::parse("23:59").unwrap().add_minutes(1), None);
}

#[test]
fn test_from_minutes_bounds() {
    assert!(TimeOfDay::from_minutes(0).is_ok());
    assert!(TimeOfDay::from_minutes(1439).is_ok());
    assert!(TimeOfDay::from_minutes(1440).is_err());
}

#[test]
fn test_serde_round_trip() {
    let value = TimeOfDay::parse("09:30").unwrap();
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, "\"09:30\"");

    let back: TimeOfDay = serde_json::from_str(&json).unwrap();
    assert_eq!(back, value);

    let err: Result<TimeOfDay, _> = serde_json::from_str("\"25:00\"");
    assert!(err.is_err());
}

#[rstest]
#[case(2026, 3, 1, 0)] // Sunday
#[case(2026, 3, 2, 1)] // Monday
#[case(2026, 3, 7, 6)] // Saturday
fn test_weekday_index(#[case] year: i32, #[case] month: u32, #[case] day: u32, #[case] expected: u8) {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
    assert_eq!(time::weekday_index(date), expected);
}
