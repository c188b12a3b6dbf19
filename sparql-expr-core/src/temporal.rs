//! XSD dateTime support
//!
//! `XsdDateTime` preserves the original lexical form for round-trip
//! output, normalizes to a UTC instant for comparison, and exposes the
//! SPARQL accessor components (YEAR, MONTH, DAY, HOURS, MINUTES, SECONDS,
//! TZ).
//!
//! Values without a timezone are treated as UTC for comparison purposes;
//! `"2024-01-01T05:00:00Z"` equals `"2024-01-01T00:00:00-05:00"` (same
//! instant).

use chrono::{
    DateTime as ChronoDateTime, Datelike, FixedOffset, NaiveDateTime, Timelike, Utc,
};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// XSD dateTime with timezone preservation.
#[derive(Clone, Debug)]
pub struct XsdDateTime {
    /// Normalized UTC instant for comparison
    instant: ChronoDateTime<Utc>,
    /// Original timezone offset (None = no timezone in input)
    tz_offset: Option<FixedOffset>,
    /// Original lexical form for round-trip output
    original: String,
}

impl XsdDateTime {
    /// Parse an XSD dateTime lexical form.
    ///
    /// Accepts:
    /// - With timezone: `2024-01-15T10:30:00Z`, `2024-01-15T10:30:00+05:00`
    /// - Without timezone (treated as UTC): `2024-01-15T10:30:00`
    /// - With fractional seconds: `2024-01-15T10:30:00.123Z`
    pub fn parse(s: &str) -> Result<Self, String> {
        if let Ok(dt) = ChronoDateTime::parse_from_rfc3339(s) {
            return Ok(Self {
                instant: dt.with_timezone(&Utc),
                tz_offset: Some(*dt.offset()),
                original: s.to_string(),
            });
        }

        for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self {
                    instant: ndt.and_utc(),
                    tz_offset: None,
                    original: s.to_string(),
                });
            }
        }

        Err(format!("Cannot parse dateTime: {}", s))
    }

    /// The current instant, with a `Z`-suffixed canonical lexical form.
    pub fn now() -> Self {
        let instant = Utc::now();
        Self {
            instant,
            tz_offset: Some(FixedOffset::east_opt(0).expect("zero offset")),
            original: instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }

    /// The normalized UTC instant.
    pub fn instant(&self) -> ChronoDateTime<Utc> {
        self.instant
    }

    /// The original timezone offset, if the lexical form carried one.
    pub fn tz_offset(&self) -> Option<FixedOffset> {
        self.tz_offset
    }

    /// The original lexical form.
    pub fn original(&self) -> &str {
        &self.original
    }

    // === SPARQL accessor components ===
    //
    // Accessors report the value as written, so they apply the original
    // offset rather than the normalized UTC instant.

    fn local(&self) -> ChronoDateTime<FixedOffset> {
        let offset = self
            .tz_offset
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset"));
        self.instant.with_timezone(&offset)
    }

    /// Year component.
    pub fn year(&self) -> i32 {
        self.local().year()
    }

    /// Month component (1-12).
    pub fn month(&self) -> u32 {
        self.local().month()
    }

    /// Day component (1-31).
    pub fn day(&self) -> u32 {
        self.local().day()
    }

    /// Hour component (0-23).
    pub fn hours(&self) -> u32 {
        self.local().hour()
    }

    /// Minute component (0-59).
    pub fn minutes(&self) -> u32 {
        self.local().minute()
    }

    /// Whole-second component (0-59).
    pub fn seconds(&self) -> u32 {
        self.local().second()
    }

    /// Sub-second component in nanoseconds.
    pub fn nanoseconds(&self) -> u32 {
        self.local().nanosecond()
    }

    /// Timezone designator as written: `""` when absent, `"Z"`, or
    /// `"+05:00"` / `"-08:00"`.
    pub fn tz_lexical(&self) -> String {
        match self.tz_offset {
            None => String::new(),
            Some(offset) => {
                if self.original.ends_with(['Z', 'z']) {
                    "Z".to_string()
                } else {
                    let secs = offset.local_minus_utc();
                    let sign = if secs < 0 { '-' } else { '+' };
                    let abs = secs.unsigned_abs();
                    format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
                }
            }
        }
    }
}

impl PartialEq for XsdDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for XsdDateTime {}

impl PartialOrd for XsdDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for XsdDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl Hash for XsdDateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
    }
}

impl fmt::Display for XsdDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_timezone() {
        let dt = XsdDateTime::parse("2024-01-15T10:30:00+05:00").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.hours(), 10);
        assert_eq!(dt.tz_lexical(), "+05:00");
    }

    #[test]
    fn test_parse_zulu() {
        let dt = XsdDateTime::parse("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.tz_lexical(), "Z");
    }

    #[test]
    fn test_parse_without_timezone() {
        let dt = XsdDateTime::parse("2024-01-15T10:30:00").unwrap();
        assert_eq!(dt.tz_offset(), None);
        assert_eq!(dt.tz_lexical(), "");
        assert_eq!(dt.original(), "2024-01-15T10:30:00");
    }

    #[test]
    fn test_same_instant_across_offsets() {
        let a = XsdDateTime::parse("2024-01-01T05:00:00Z").unwrap();
        let b = XsdDateTime::parse("2024-01-01T00:00:00-05:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_instant_ordering() {
        let a = XsdDateTime::parse("2024-01-01T00:00:00Z").unwrap();
        let b = XsdDateTime::parse("2024-01-01T00:00:01Z").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_fractional_seconds() {
        let dt = XsdDateTime::parse("2024-01-15T10:30:00.123Z").unwrap();
        assert_eq!(dt.seconds(), 0);
        assert_eq!(dt.nanoseconds(), 123_000_000);
    }

    #[test]
    fn test_invalid_forms() {
        assert!(XsdDateTime::parse("2024-01-15").is_err());
        assert!(XsdDateTime::parse("not a date").is_err());
        assert!(XsdDateTime::parse("2024-13-01T00:00:00Z").is_err());
    }

    #[test]
    fn test_accessors_use_original_offset() {
        let dt = XsdDateTime::parse("2024-01-01T00:00:00-05:00").unwrap();
        // UTC instant is 05:00, but the value as written reads midnight
        assert_eq!(dt.hours(), 0);
        assert_eq!(dt.day(), 1);
    }
}
