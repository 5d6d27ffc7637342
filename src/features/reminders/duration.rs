//! Duration token parsing.
//!
//! A duration token is a signed base-10 amount followed by exactly one unit
//! suffix, e.g. `24h` or `90s`. Parsing is pure; the clock is never read here.

use thiserror::Error;

/// Seconds in a Julian year. A reminder a year out drifts from the calendar
/// by design; nobody cares about leap seconds on a `1y` reminder.
const JULIAN_YEAR_SECS: i64 = 31_556_952;

/// Time unit selected by the trailing character of a duration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Years,
}

impl Unit {
    fn from_suffix(suffix: char) -> Option<Unit> {
        match suffix {
            's' => Some(Unit::Seconds),
            'm' => Some(Unit::Minutes),
            'h' => Some(Unit::Hours),
            'd' => Some(Unit::Days),
            'w' => Some(Unit::Weeks),
            'y' => Some(Unit::Years),
            _ => None,
        }
    }

    fn seconds(self) -> i64 {
        match self {
            Unit::Seconds => 1,
            Unit::Minutes => 60,
            Unit::Hours => 3_600,
            Unit::Days => 86_400,
            Unit::Weeks => 604_800,
            Unit::Years => JULIAN_YEAR_SECS,
        }
    }
}

/// Why a duration token was rejected.
///
/// The display strings go straight back to the requester as chat replies, so
/// they are written for humans, not logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("`{0}` doesn't look like a number of time units to me")]
    InvalidAmount(String),
    #[error("I don't know the time unit `{unit}` in `{token}` (try s, m, h, d, w or y)")]
    UnknownUnit { unit: char, token: String },
    #[error("that reminder wouldn't be in the future - give me something like `10m` or `24h`")]
    ZeroOrNegative,
}

/// Parse a token like `24h` into a number of seconds.
///
/// A zero or negative result is rejected as [`DurationError::ZeroOrNegative`],
/// distinct from an unknown unit, so `0s` and `24x` fail for different
/// reasons.
pub fn parse_duration(token: &str) -> Result<i64, DurationError> {
    let Some((last, suffix)) = token.char_indices().last() else {
        return Err(DurationError::InvalidAmount(String::new()));
    };

    let amount = &token[..last];
    let amount: i64 = amount
        .parse()
        .map_err(|_| DurationError::InvalidAmount(amount.to_string()))?;

    let unit = Unit::from_suffix(suffix).ok_or(DurationError::UnknownUnit {
        unit: suffix,
        token: token.to_string(),
    })?;

    let seconds = amount
        .checked_mul(unit.seconds())
        .ok_or_else(|| DurationError::InvalidAmount(token.to_string()))?;

    if seconds <= 0 {
        return Err(DurationError::ZeroOrNegative);
    }

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_duration("30s"), Ok(30));
        assert_eq!(parse_duration("5m"), Ok(300));
        assert_eq!(parse_duration("24h"), Ok(86_400));
        assert_eq!(parse_duration("1d"), Ok(86_400));
        assert_eq!(parse_duration("2w"), Ok(1_209_600));
        assert_eq!(parse_duration("1y"), Ok(31_556_952));
    }

    #[test]
    fn parses_multi_digit_amounts() {
        assert_eq!(parse_duration("120s"), Ok(120));
        assert_eq!(parse_duration("1000h"), Ok(3_600_000));
    }

    #[test]
    fn rejects_unknown_units() {
        assert_eq!(
            parse_duration("24x"),
            Err(DurationError::UnknownUnit {
                unit: 'x',
                token: "24x".to_string()
            })
        );
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert_eq!(
            parse_duration("xh"),
            Err(DurationError::InvalidAmount("x".to_string()))
        );
        assert_eq!(
            parse_duration("1.5h"),
            Err(DurationError::InvalidAmount("1.5".to_string()))
        );
    }

    #[test]
    fn rejects_tokens_with_no_amount_at_all() {
        assert_eq!(
            parse_duration("h"),
            Err(DurationError::InvalidAmount(String::new()))
        );
        assert_eq!(
            parse_duration(""),
            Err(DurationError::InvalidAmount(String::new()))
        );
    }

    #[test]
    fn rejects_zero_and_negative_durations() {
        assert_eq!(parse_duration("0h"), Err(DurationError::ZeroOrNegative));
        assert_eq!(parse_duration("0s"), Err(DurationError::ZeroOrNegative));
        assert_eq!(parse_duration("-5m"), Err(DurationError::ZeroOrNegative));
    }

    #[test]
    fn overflowing_amounts_are_invalid_not_a_panic() {
        let token = format!("{}d", i64::MAX);
        assert!(matches!(
            parse_duration(&token),
            Err(DurationError::InvalidAmount(_))
        ));
    }
}
