//! Event records produced from CSV rows.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// A point in time as read from the CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// No zone information (written without Z or TZID)
    Floating(NaiveDateTime),
    /// The source text carried an explicit offset
    Utc(DateTime<Utc>),
    /// Wall-clock time in a configured zone (written with TZID)
    Zoned { datetime: NaiveDateTime, tz: Tz },
}

impl EventTime {
    /// Attach a zone to a floating time. Other variants are unchanged.
    pub fn in_zone(self, tz: Option<Tz>) -> Self {
        match (self, tz) {
            (EventTime::Floating(datetime), Some(tz)) => EventTime::Zoned { datetime, tz },
            (time, _) => time,
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Floating(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            EventTime::Utc(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%SZ")),
            EventTime::Zoned { datetime, tz } => {
                write!(f, "{} {}", datetime.format("%Y-%m-%d %H:%M:%S"), tz.name())
            }
        }
    }
}

/// A validated calendar event, one per accepted CSV row.
///
/// `start` is not required to precede `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// 1-based line of the record in the input file
    pub line: u64,
    pub subject: String,
    pub start: EventTime,
    pub end: EventTime,
    pub description: String,
    pub location: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn ten_am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn in_zone_only_touches_floating() {
        let tz = chrono_tz::Europe::Paris;
        assert_eq!(
            EventTime::Floating(ten_am()).in_zone(Some(tz)),
            EventTime::Zoned { datetime: ten_am(), tz }
        );
        assert_eq!(
            EventTime::Floating(ten_am()).in_zone(None),
            EventTime::Floating(ten_am())
        );

        let utc = EventTime::Utc(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(utc.in_zone(Some(tz)), utc);
    }

    #[test]
    fn display_formats() {
        assert_eq!(EventTime::Floating(ten_am()).to_string(), "2024-01-01 10:00:00");
        assert_eq!(
            EventTime::Zoned { datetime: ten_am(), tz: chrono_tz::UTC }.to_string(),
            "2024-01-01 10:00:00 UTC"
        );
    }
}
