//! Turns one CSV row into an event record.

use crate::config::ConvertConfig;
use crate::date::DateParser;
use crate::event::EventRecord;
use crate::report::SkipReason;
use crate::row::Row;

/// Result of mapping a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Event(EventRecord),
    Skip(SkipReason),
}

/// True if the value starts like a date: an ASCII digit 1-9.
///
/// Header lines read as data fail this check. Dates written with a leading
/// zero or with month names fail it too.
pub fn looks_like_data(value: &str) -> bool {
    matches!(value.as_bytes().first(), Some(b'1'..=b'9'))
}

/// Map one row using the configured column ordinals.
///
/// Never fails: malformed rows come back as [`RowOutcome::Skip`].
pub fn map_row(row: &Row, line: u64, config: &ConvertConfig, parser: &DateParser) -> RowOutcome {
    let columns = &config.columns;

    let start_raw = match row.field_at(columns.start) {
        Some(value) if looks_like_data(value) => value,
        other => {
            return RowOutcome::Skip(SkipReason::NotData {
                value: other.map(str::to_string),
            });
        }
    };

    let text_at = |ordinal: usize| row.field_at(ordinal).unwrap_or_default().to_string();
    let end_raw = text_at(columns.end);

    // No ordering check between start and end
    let (start, end) = match (parser.parse(start_raw), parser.parse(&end_raw)) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return RowOutcome::Skip(SkipReason::BadDate {
                start: start_raw.to_string(),
                end: end_raw,
            });
        }
    };

    RowOutcome::Event(EventRecord {
        line,
        subject: text_at(columns.subject),
        start: start.in_zone(config.timezone),
        end: end.in_zone(config.timezone),
        description: text_at(columns.description),
        location: text_at(columns.location),
        url: config.metadata.url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnMap;
    use crate::event::EventTime;
    use chrono::NaiveDate;
    use csv::StringRecord;

    fn config() -> ConvertConfig {
        ConvertConfig::new("in.csv", "out.ics")
    }

    fn row(fields: &[&str]) -> Row {
        Row::positional(&StringRecord::from(fields.to_vec()))
    }

    fn floating(h: u32) -> EventTime {
        EventTime::Floating(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )
    }

    fn expect_event(outcome: RowOutcome) -> EventRecord {
        match outcome {
            RowOutcome::Event(event) => event,
            RowOutcome::Skip(reason) => panic!("expected event, got skip: {:?}", reason),
        }
    }

    #[test]
    fn guard_check() {
        assert!(looks_like_data("2024-01-01"));
        assert!(looks_like_data("1/2/2024"));
        assert!(looks_like_data("9"));
        assert!(!looks_like_data("0"));
        assert!(!looks_like_data("01/02/2024"));
        assert!(!looks_like_data("Start Date"));
        assert!(!looks_like_data(" 2024-01-01"));
        assert!(!looks_like_data(""));
    }

    #[test]
    fn maps_default_columns() {
        let event = expect_event(map_row(
            &row(&["Meeting", "2024-01-01 10:00", "2024-01-01 11:00", "Standup", "Room1"]),
            2,
            &config(),
            &DateParser::Flexible,
        ));

        assert_eq!(event.line, 2);
        assert_eq!(event.subject, "Meeting");
        assert_eq!(event.start, floating(10));
        assert_eq!(event.end, floating(11));
        assert_eq!(event.description, "Standup");
        assert_eq!(event.location, "Room1");
        assert_eq!(event.url, "http://mycompany.com/");
    }

    #[test]
    fn honours_column_remapping() {
        let mut config = config();
        config.columns = ColumnMap::from_ordinals(&[2, 3, 4, 0, 1]).unwrap();

        let event = expect_event(map_row(
            &row(&["Standup", "Room1", "Meeting", "2024-01-01 10:00", "2024-01-01 11:00"]),
            1,
            &config,
            &DateParser::Flexible,
        ));

        assert_eq!(event.subject, "Meeting");
        assert_eq!(event.start, floating(10));
        assert_eq!(event.end, floating(11));
        assert_eq!(event.description, "Standup");
        assert_eq!(event.location, "Room1");
    }

    #[test]
    fn header_like_row_is_not_data() {
        let outcome = map_row(
            &row(&["Subject", "Start Date", "End Date", "Description", "Location"]),
            1,
            &config(),
            &DateParser::Flexible,
        );
        assert_eq!(
            outcome,
            RowOutcome::Skip(SkipReason::NotData {
                value: Some("Start Date".into())
            })
        );
    }

    #[test]
    fn short_row_is_not_data() {
        let outcome = map_row(&row(&["Meeting"]), 3, &config(), &DateParser::Flexible);
        assert_eq!(outcome, RowOutcome::Skip(SkipReason::NotData { value: None }));
    }

    #[test]
    fn unparsable_dates_are_dropped() {
        let parser = DateParser::new(Some("DD-MM-YYYY HH:mm"));

        let bad_start = map_row(
            &row(&["Meeting", "2024-01-01 10:00", "01-01-2024 11:00", "", ""]),
            1,
            &config(),
            &parser,
        );
        assert!(matches!(bad_start, RowOutcome::Skip(SkipReason::BadDate { .. })));

        let bad_end = map_row(
            &row(&["Meeting", "01-01-2024 10:00", "soon", "", ""]),
            1,
            &config(),
            &parser,
        );
        assert_eq!(
            bad_end,
            RowOutcome::Skip(SkipReason::BadDate {
                start: "01-01-2024 10:00".into(),
                end: "soon".into()
            })
        );
    }

    #[test]
    fn missing_end_column_is_a_bad_date() {
        let outcome = map_row(
            &row(&["Meeting", "2024-01-01 10:00"]),
            1,
            &config(),
            &DateParser::Flexible,
        );
        assert_eq!(
            outcome,
            RowOutcome::Skip(SkipReason::BadDate {
                start: "2024-01-01 10:00".into(),
                end: String::new()
            })
        );
    }

    #[test]
    fn missing_text_columns_are_empty() {
        let mut config = config();
        config.columns = ColumnMap::from_ordinals(&[0, 1, 2, 7, 8]).unwrap();

        let event = expect_event(map_row(
            &row(&["Meeting", "2024-01-01 10:00", "2024-01-01 11:00"]),
            1,
            &config,
            &DateParser::Flexible,
        ));
        assert_eq!(event.description, "");
        assert_eq!(event.location, "");
    }

    #[test]
    fn end_before_start_is_kept() {
        let event = expect_event(map_row(
            &row(&["Oops", "2024-01-01 11:00", "2024-01-01 10:00", "", ""]),
            1,
            &config(),
            &DateParser::Flexible,
        ));
        assert_eq!(event.start, floating(11));
        assert_eq!(event.end, floating(10));
    }

    #[test]
    fn timezone_applies_to_both_ends() {
        let mut config = config();
        config.timezone = Some(chrono_tz::America::New_York);

        let event = expect_event(map_row(
            &row(&["Meeting", "2024-01-01 10:00", "2024-01-01 11:00", "", ""]),
            1,
            &config,
            &DateParser::Flexible,
        ));
        assert_eq!(event.start, floating(10).in_zone(config.timezone));
        assert_eq!(event.end, floating(11).in_zone(config.timezone));
        assert!(matches!(event.end, EventTime::Zoned { .. }));
    }
}
