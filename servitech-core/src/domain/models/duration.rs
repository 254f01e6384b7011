use std::{fmt, str::FromStr};

use thiserror::Error;

/// Recorded work time, in whole seconds.
///
/// Travels over the wire as `HH:MM:SS` (zero padded, hours uncapped).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkDuration(u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWorkDurationError {
    #[error("expected HH:MM:SS, got {0:?}")]
    BadShape(String),
    #[error("non-numeric segment in {0:?}")]
    NotANumber(String),
    #[error("minutes and seconds must be below 60 in {0:?}")]
    OutOfRange(String),
}

impl WorkDuration {
    pub const ZERO: WorkDuration = WorkDuration(0);

    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Split into (hours, minutes, seconds).
    pub fn hms(&self) -> (u64, u64, u64) {
        (self.0 / 3600, (self.0 % 3600) / 60, self.0 % 60)
    }

    pub fn saturating_add(self, other: WorkDuration) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Parse a backend value, mapping anything missing or malformed to zero.
    ///
    /// The stopwatch must always be displayable, so this never fails.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::ZERO;
        };
        if raw.trim().is_empty() {
            return Self::ZERO;
        }
        match raw.parse() {
            Ok(duration) => duration,
            Err(e) => {
                tracing::debug!("Treating malformed duration as zero: {}", e);
                Self::ZERO
            }
        }
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.hms();
        write!(f, "{:02}:{:02}:{:02}", h, m, s)
    }
}

impl FromStr for WorkDuration {
    type Err = ParseWorkDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();
        let [h, m, sec] = parts.as_slice() else {
            return Err(ParseWorkDurationError::BadShape(s.to_string()));
        };

        let number = |part: &str| -> Result<u64, ParseWorkDurationError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseWorkDurationError::NotANumber(s.to_string()));
            }
            part.parse::<u64>()
                .map_err(|_| ParseWorkDurationError::NotANumber(s.to_string()))
        };

        let (h, m, sec) = (number(*h)?, number(*m)?, number(*sec)?);
        if m >= 60 || sec >= 60 {
            return Err(ParseWorkDurationError::OutOfRange(s.to_string()));
        }

        h.checked_mul(3600)
            .and_then(|total| total.checked_add(m * 60 + sec))
            .map(Self)
            .ok_or_else(|| ParseWorkDurationError::OutOfRange(s.to_string()))
    }
}

impl From<WorkDuration> for std::time::Duration {
    fn from(value: WorkDuration) -> Self {
        std::time::Duration::from_secs(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_zero_padded() {
        assert_eq!(WorkDuration::ZERO.to_string(), "00:00:00");
        assert_eq!(WorkDuration::from_secs(8).to_string(), "00:00:08");
        assert_eq!(WorkDuration::from_secs(3_723).to_string(), "01:02:03");
    }

    #[test]
    fn hours_are_not_capped_at_a_day() {
        assert_eq!(WorkDuration::from_secs(100 * 3600).to_string(), "100:00:00");
        assert_eq!(
            "100:00:00".parse::<WorkDuration>().unwrap(),
            WorkDuration::from_secs(360_000)
        );
    }

    #[test]
    fn accepts_unpadded_hours() {
        assert_eq!(
            "0:03:10".parse::<WorkDuration>().unwrap(),
            WorkDuration::from_secs(190)
        );
    }

    #[test]
    fn strict_parse_rejects_garbage() {
        assert!("".parse::<WorkDuration>().is_err());
        assert!("12:30".parse::<WorkDuration>().is_err());
        assert!("aa:bb:cc".parse::<WorkDuration>().is_err());
        assert!("-1:00:00".parse::<WorkDuration>().is_err());
        assert!("00:61:00".parse::<WorkDuration>().is_err());
    }

    #[test]
    fn lenient_parse_falls_back_to_zero() {
        assert_eq!(WorkDuration::parse_lenient(None), WorkDuration::ZERO);
        assert_eq!(WorkDuration::parse_lenient(Some("")), WorkDuration::ZERO);
        assert_eq!(WorkDuration::parse_lenient(Some("  ")), WorkDuration::ZERO);
        assert_eq!(WorkDuration::parse_lenient(Some("1h 20m")), WorkDuration::ZERO);
        assert_eq!(
            WorkDuration::parse_lenient(Some("00:00:42")),
            WorkDuration::from_secs(42)
        );
    }

    proptest! {
        #[test]
        fn format_then_parse_is_identity(secs in 0u64..=359_999) {
            let formatted = WorkDuration::from_secs(secs).to_string();
            prop_assert_eq!(formatted.len(), 8);
            let parsed: WorkDuration = formatted.parse().unwrap();
            prop_assert_eq!(parsed.as_secs(), secs);
        }
    }
}
