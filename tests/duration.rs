use std::time::Duration;

use dapr_sdk::serializers::duration::{self, DurationError, ElapsedTime};
use dapr_sdk::serializers::{convert_from_dapr_duration, convert_to_dapr_duration};

#[test]
fn test_sdk_named_conversions() {
    let elapsed = convert_from_dapr_duration("4h15m50s").unwrap();
    assert_eq!(
        (elapsed.days, elapsed.hours, elapsed.minutes, elapsed.seconds),
        (0, 4, 15, 50)
    );
    assert_eq!(convert_to_dapr_duration(elapsed), "4h15m50s");
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        duration::decode(""),
        Err(DurationError::InvalidFormat(input)) if input.is_empty()
    ));
    assert!(matches!(
        duration::decode("xyz"),
        Err(DurationError::InvalidFormat(input)) if input == "xyz"
    ));
}

#[test]
fn test_reminder_period_through_std_duration() {
    let period: Duration = "1h30m".parse::<ElapsedTime>().unwrap().into();
    assert_eq!(period, Duration::from_secs(5400));

    let text = ElapsedTime::from(Duration::from_secs(3661)).to_string();
    assert_eq!(text, "1h1m1s");
}

#[test]
fn test_day_sized_spans() {
    let elapsed = duration::decode("49h0m5s").unwrap();
    assert_eq!((elapsed.days, elapsed.hours), (2, 1));
    assert_eq!(duration::encode(elapsed), "49h0m5s");
}
