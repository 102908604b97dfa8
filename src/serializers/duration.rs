//! Conversion between the Dapr duration notation and elapsed time.
//!
//! The sidecar exchanges durations (actor idle timeouts, reminder periods,
//! timer due times) as a subset of Go's duration format:
//!
//! - `4h15m50s` — four hours, fifteen minutes and fifty seconds
//! - `30h` — one day and six hours
//! - `15m` — fifteen minutes
//!
//! Every segment is optional but the order is fixed (`h`, then `m`, then
//! `s`) and at least one segment must be present.
//!
//! # Example
//!
//! ```
//! use dapr_sdk::serializers::duration::{ElapsedTime, decode, encode};
//!
//! let elapsed = decode("30h").unwrap();
//! assert_eq!((elapsed.days, elapsed.hours), (1, 6));
//! assert_eq!(encode(ElapsedTime::from_secs(3661)), "1h1m1s");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const HOURS_PER_DAY: u64 = 24;

/// Unit letters in the order they may appear.
const UNITS: [u8; 3] = [b'h', b'm', b's'];

/// Errors produced while decoding a duration string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DurationError {
    /// The text does not follow `(<H>h)?(<M>m)?(<S>s)?` or has no segment.
    #[error("invalid Dapr duration format: '{0}'")]
    InvalidFormat(String),
}

/// A span of time split into days, hours, minutes and seconds.
///
/// Decoding only carries the hour segment into days; minutes and seconds
/// are kept as written. Two values compare equal when they describe the
/// same total number of seconds, whatever the split.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElapsedTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ElapsedTime {
    pub const ZERO: ElapsedTime = ElapsedTime {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn new(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    /// Build a fully normalized value from a number of seconds.
    pub fn from_secs(total: u64) -> Self {
        Self {
            days: total / SECS_PER_DAY,
            hours: (total % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total % SECS_PER_MINUTE,
        }
    }

    /// Total elapsed seconds. Widened so that any field combination fits.
    pub fn total_seconds(&self) -> u128 {
        u128::from(self.days) * u128::from(SECS_PER_DAY)
            + u128::from(self.hours) * u128::from(SECS_PER_HOUR)
            + u128::from(self.minutes) * u128::from(SECS_PER_MINUTE)
            + u128::from(self.seconds)
    }
}

impl PartialEq for ElapsedTime {
    fn eq(&self, other: &Self) -> bool {
        self.total_seconds() == other.total_seconds()
    }
}

impl Eq for ElapsedTime {}

impl Hash for ElapsedTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.total_seconds().hash(state);
    }
}

impl PartialOrd for ElapsedTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ElapsedTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_seconds().cmp(&other.total_seconds())
    }
}

impl FromStr for ElapsedTime {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(*self))
    }
}

impl From<Duration> for ElapsedTime {
    /// Sub-second precision is dropped.
    fn from(duration: Duration) -> Self {
        Self::from_secs(duration.as_secs())
    }
}

impl From<ElapsedTime> for Duration {
    /// Saturates at `u64::MAX` seconds.
    fn from(elapsed: ElapsedTime) -> Self {
        Duration::from_secs(u64::try_from(elapsed.total_seconds()).unwrap_or(u64::MAX))
    }
}

/// Decode a compact duration such as `4h15m50s`.
pub fn decode(text: &str) -> Result<ElapsedTime, DurationError> {
    let invalid = || DurationError::InvalidFormat(text.to_owned());

    let [hours, minutes, seconds] = scan_segments(text).ok_or_else(invalid)?;
    if hours.is_none() && minutes.is_none() && seconds.is_none() {
        return Err(invalid());
    }

    let hours = hours.unwrap_or(0);
    let minutes = minutes.unwrap_or(0);
    let seconds = seconds.unwrap_or(0);

    // The whole span must still be expressible in seconds.
    hours
        .checked_mul(SECS_PER_HOUR)
        .and_then(|total| total.checked_add(minutes.checked_mul(SECS_PER_MINUTE)?))
        .and_then(|total| total.checked_add(seconds))
        .ok_or_else(invalid)?;

    Ok(ElapsedTime {
        days: hours / HOURS_PER_DAY,
        hours: hours % HOURS_PER_DAY,
        minutes,
        seconds,
    })
}

/// Encode an elapsed span as `<H>h<M>m<S>s`.
///
/// All three segments are always written. Days are folded back into hours.
pub fn encode(elapsed: ElapsedTime) -> String {
    let total = elapsed.total_seconds();
    let minutes_total = total / u128::from(SECS_PER_MINUTE);
    let seconds = total % u128::from(SECS_PER_MINUTE);
    let hours = minutes_total / 60;
    let minutes = minutes_total % 60;

    format!("{hours}h{minutes}m{seconds}s")
}

/// Alias of [`decode`] under the name used across Dapr SDKs.
pub fn convert_from_dapr_duration(text: &str) -> Result<ElapsedTime, DurationError> {
    decode(text)
}

/// Alias of [`encode`] under the name used across Dapr SDKs.
pub fn convert_to_dapr_duration(elapsed: ElapsedTime) -> String {
    encode(elapsed)
}

/// Split `text` into its hour, minute and second values.
///
/// Returns `None` when content is left over after the last segment or a
/// digit run does not fit in `u64`. A digit run that is not followed by
/// the unit currently expected is left for the next unit to claim.
fn scan_segments(text: &str) -> Option<[Option<u64>; 3]> {
    let mut rest = text;
    let mut values = [None; 3];

    for (slot, unit) in values.iter_mut().zip(UNITS) {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || rest.as_bytes().get(digits) != Some(&unit) {
            continue;
        }

        *slot = Some(rest[..digits].parse::<u64>().ok()?);
        rest = &rest[digits + 1..];
    }

    rest.is_empty().then_some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_segments() {
        let elapsed = decode("4h15m50s").unwrap();
        assert_eq!(elapsed.days, 0);
        assert_eq!(elapsed.hours, 4);
        assert_eq!(elapsed.minutes, 15);
        assert_eq!(elapsed.seconds, 50);
    }

    #[test]
    fn test_decode_hours_carry_into_days() {
        let elapsed = decode("30h").unwrap();
        assert_eq!(
            (elapsed.days, elapsed.hours, elapsed.minutes, elapsed.seconds),
            (1, 6, 0, 0)
        );
    }

    #[test]
    fn test_decode_single_segments() {
        let minutes = decode("15m").unwrap();
        assert_eq!(
            (minutes.days, minutes.hours, minutes.minutes, minutes.seconds),
            (0, 0, 15, 0)
        );

        let seconds = decode("7s").unwrap();
        assert_eq!(seconds.seconds, 7);
        assert_eq!(seconds.total_seconds(), 7);
    }

    #[test]
    fn test_decode_keeps_minutes_and_seconds_verbatim() {
        let elapsed = decode("90m75s").unwrap();
        assert_eq!(elapsed.hours, 0);
        assert_eq!(elapsed.minutes, 90);
        assert_eq!(elapsed.seconds, 75);
        assert_eq!(elapsed.total_seconds(), 90 * 60 + 75);
    }

    #[test]
    fn test_decode_skipped_middle_segment() {
        let elapsed = decode("1h5s").unwrap();
        assert_eq!((elapsed.hours, elapsed.minutes, elapsed.seconds), (1, 0, 5));
    }

    #[test]
    fn test_decode_rejects_empty_and_garbage() {
        for input in ["", "xyz", "h", "1h30", "30s1h", " 1h", "1h ", "1d", "-1h", "1.5h"] {
            assert_eq!(
                decode(input),
                Err(DurationError::InvalidFormat(input.to_owned())),
                "input {input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_rejects_overflow() {
        assert!(decode("99999999999999999999h").is_err());
        assert!(decode(&format!("{}h", u64::MAX)).is_err());
        assert!(decode(&format!("{}s", u64::MAX)).is_ok());
    }

    #[test]
    fn test_error_message_names_input() {
        let err = decode("abc").unwrap_err();
        assert_eq!(err.to_string(), "invalid Dapr duration format: 'abc'");
    }

    #[test]
    fn test_encode_fixed_layout() {
        assert_eq!(encode(ElapsedTime::from_secs(3661)), "1h1m1s");
        assert_eq!(encode(ElapsedTime::ZERO), "0h0m0s");
        assert_eq!(encode(ElapsedTime::new(0, 4, 15, 50)), "4h15m50s");
    }

    #[test]
    fn test_encode_does_not_emit_days() {
        assert_eq!(encode(ElapsedTime::new(1, 6, 0, 0)), "30h0m0s");
        assert_eq!(encode(ElapsedTime::new(2, 0, 0, 0)), "48h0m0s");
    }

    #[test]
    fn test_encode_renormalizes_overflowing_fields() {
        assert_eq!(encode(decode("90m").unwrap()), "1h30m0s");
        assert_eq!(encode(decode("125s").unwrap()), "0h2m5s");
    }

    #[test]
    fn test_encode_matches_components() {
        for (h, m, s) in [(0, 0, 1), (3, 59, 59), (23, 0, 30), (100, 7, 0)] {
            let elapsed = ElapsedTime::new(0, h, m, s);
            assert_eq!(encode(elapsed), format!("{h}h{m}m{s}s"));
        }
    }

    #[test]
    fn test_round_trip_within_normal_ranges() {
        for (h, m, s) in [(0, 0, 0), (1, 2, 3), (23, 59, 59), (12, 0, 45)] {
            let elapsed = ElapsedTime::new(0, h, m, s);
            let decoded = decode(&encode(elapsed)).unwrap();
            assert_eq!(decoded, elapsed);
            assert_eq!(
                (decoded.days, decoded.hours, decoded.minutes, decoded.seconds),
                (0, h, m, s)
            );
        }
    }

    #[test]
    fn test_equality_compares_total_time() {
        assert_eq!(decode("90m").unwrap(), decode("1h30m").unwrap());
        assert!(decode("59m").unwrap() < decode("1h").unwrap());
    }

    #[test]
    fn test_from_str_and_display() {
        let elapsed: ElapsedTime = "2h3m4s".parse().unwrap();
        assert_eq!(elapsed.to_string(), "2h3m4s");
        assert!("nope".parse::<ElapsedTime>().is_err());
    }

    #[test]
    fn test_std_duration_conversions() {
        let elapsed = ElapsedTime::from(Duration::from_millis(61_500));
        assert_eq!((elapsed.minutes, elapsed.seconds), (1, 1));

        let duration: Duration = decode("30h").unwrap().into();
        assert_eq!(duration, Duration::from_secs(30 * 3600));
    }

    #[test]
    fn test_from_secs_normalizes() {
        let elapsed = ElapsedTime::from_secs(90_061);
        assert_eq!(
            (elapsed.days, elapsed.hours, elapsed.minutes, elapsed.seconds),
            (1, 1, 1, 1)
        );
    }
}
