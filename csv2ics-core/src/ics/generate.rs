//! ICS file generation.

use std::path::Path;

use icalendar::{Calendar, Component, EventLike, Property};
use uuid::Uuid;

use crate::calendar::EventCalendar;
use crate::config::CalendarMeta;
use crate::error::{ConvertError, ConvertResult};
use crate::event::{EventRecord, EventTime};

/// Render the whole calendar as iCalendar text (CRLF line endings).
pub fn generate_ics(calendar: &EventCalendar) -> String {
    let mut cal = Calendar::new();
    cal.name(&calendar.meta.name);

    let dtstamp = calendar.stamp.format("%Y%m%dT%H%M%SZ").to_string();

    for record in calendar.events() {
        let mut ics_event = icalendar::Event::new();

        ics_event.uid(&event_uid(&calendar.meta, record));
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.summary(&record.subject);

        add_datetime_property(&mut ics_event, "DTSTART", &record.start);
        add_datetime_property(&mut ics_event, "DTEND", &record.end);

        if !record.description.is_empty() {
            ics_event.description(&record.description);
        }

        if !record.location.is_empty() {
            ics_event.location(&record.location);
        }

        if !record.url.is_empty() {
            ics_event.add_property("URL", &record.url);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    rewrite_header(&cal.to_string(), &calendar.meta)
}

/// Render the calendar and write it to `path`, replacing any existing file.
pub fn write_calendar(calendar: &EventCalendar, path: &Path) -> ConvertResult<()> {
    std::fs::write(path, generate_ics(calendar)).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Clean up the calendar header emitted by the icalendar crate
/// - Replace PRODID with the configured company/product/language
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn rewrite_header(ics: &str, meta: &CalendarMeta) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str(&fold_line(&format!("PRODID:{}", meta.prod_id())));
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Fold a content line at 75 octets (RFC 5545 3.1): CRLF followed by a
/// single space, never splitting a UTF-8 character.
fn fold_line(line: &str) -> String {
    const LIMIT: usize = 75;

    let mut folded = String::with_capacity(line.len() + line.len() / LIMIT * 3);
    let mut width = 0;

    for c in line.chars() {
        if width + c.len_utf8() > LIMIT {
            folded.push_str("\r\n ");
            // The leading space counts toward the next line
            width = 1;
        }
        folded.push(c);
        width += c.len_utf8();
    }

    folded
}

/// Stable UID: the same row content on the same line always gets the same id.
fn event_uid(meta: &CalendarMeta, record: &EventRecord) -> String {
    let namespace = Uuid::new_v5(&Uuid::NAMESPACE_DNS, meta.domain.as_bytes());
    let name = format!(
        "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}",
        record.line, record.subject, record.start, record.end, record.description, record.location
    );

    format!("{}@{}", Uuid::new_v5(&namespace, name.as_bytes()), meta.domain)
}

/// Add a datetime property with proper formatting based on EventTime variant
fn add_datetime_property(ics_event: &mut icalendar::Event, name: &str, time: &EventTime) {
    match time {
        EventTime::Floating(dt) => {
            // Floating datetime (no Z, no TZID)
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%S").to_string());
        }
        EventTime::Utc(dt) => {
            ics_event.add_property(name, dt.format("%Y%m%dT%H%M%SZ").to_string());
        }
        EventTime::Zoned { datetime, tz } => {
            let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
            prop.add_parameter("TZID", tz.name());
            ics_event.append_property(prop);
        }
    }
}
