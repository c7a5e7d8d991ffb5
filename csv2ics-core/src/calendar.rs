//! In-memory calendar built up during a conversion.

use chrono::{DateTime, Utc};

use crate::config::CalendarMeta;
use crate::event::EventRecord;

/// Accepted events plus the fixed calendar metadata.
///
/// Events keep the order of the CSV rows they came from.
#[derive(Debug, Clone)]
pub struct EventCalendar {
    pub meta: CalendarMeta,
    /// Written as DTSTAMP on every event
    pub stamp: DateTime<Utc>,
    events: Vec<EventRecord>,
}

impl EventCalendar {
    pub fn new(meta: CalendarMeta, stamp: DateTime<Utc>) -> Self {
        EventCalendar {
            meta,
            stamp,
            events: Vec::new(),
        }
    }

    /// Append an event. No deduplication, no sorting.
    pub fn add_event(&mut self, event: EventRecord) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use chrono::NaiveDate;

    fn record(line: u64, subject: &str) -> EventRecord {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        EventRecord {
            line,
            subject: subject.to_string(),
            start: EventTime::Floating(at),
            end: EventTime::Floating(at),
            description: String::new(),
            location: String::new(),
            url: "http://mycompany.com/".to_string(),
        }
    }

    #[test]
    fn keeps_insertion_order_and_duplicates() {
        let mut cal = EventCalendar::new(CalendarMeta::default(), Utc::now());
        assert!(cal.is_empty());

        cal.add_event(record(3, "Later row"));
        cal.add_event(record(2, "Earlier row"));
        cal.add_event(record(3, "Later row"));

        assert_eq!(cal.len(), 3);
        let subjects: Vec<_> = cal.events().iter().map(|e| e.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Later row", "Earlier row", "Later row"]);
    }
}
