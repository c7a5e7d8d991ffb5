//! Ordered CSV rows with ordinal field lookup.

use csv::StringRecord;

/// Key a row field is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    /// Header name (headers enabled)
    Name(String),
    /// Column position (headers disabled)
    Index(usize),
}

/// One CSV record as an ordered list of keyed fields.
///
/// Fields behave like an insertion-ordered map: with headers, a header name
/// that repeats keeps the position where it first appeared and takes the
/// value of its last occurrence. Ordinal lookup therefore walks the distinct
/// keys, not the raw columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(FieldKey, String)>,
}

impl Row {
    /// Build a row keyed by header names.
    ///
    /// Columns past the end of the header line are keyed by their position.
    pub fn with_headers(headers: &StringRecord, record: &StringRecord) -> Self {
        let mut row = Row { fields: Vec::with_capacity(record.len()) };

        for (i, value) in record.iter().enumerate() {
            let key = match headers.get(i) {
                Some(name) => FieldKey::Name(name.to_string()),
                None => FieldKey::Index(i),
            };
            row.insert(key, value);
        }

        row
    }

    /// Build a row keyed by column position.
    pub fn positional(record: &StringRecord) -> Self {
        Row {
            fields: record
                .iter()
                .enumerate()
                .map(|(i, value)| (FieldKey::Index(i), value.to_string()))
                .collect(),
        }
    }

    fn insert(&mut self, key: FieldKey, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.fields.push((key, value.to_string())),
        }
    }

    /// Value of the `ordinal`-th key in insertion order.
    pub fn field_at(&self, ordinal: usize) -> Option<&str> {
        self.fields.get(ordinal).map(|(_, value)| value.as_str())
    }

    /// Key of the `ordinal`-th field.
    #[cfg(test)]
    fn key_at(&self, ordinal: usize) -> Option<&FieldKey> {
        self.fields.get(ordinal).map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn positional_lookup() {
        let row = Row::positional(&record(&["Meeting", "2024-01-01", "2024-01-02"]));
        assert_eq!(row.len(), 3);
        assert_eq!(row.field_at(0), Some("Meeting"));
        assert_eq!(row.field_at(2), Some("2024-01-02"));
        assert_eq!(row.field_at(3), None);
        assert_eq!(row.key_at(1), Some(&FieldKey::Index(1)));
    }

    #[test]
    fn header_lookup_matches_positional_for_distinct_headers() {
        let headers = record(&["Subject", "Start", "End"]);
        let values = record(&["Meeting", "2024-01-01", "2024-01-02"]);
        let named = Row::with_headers(&headers, &values);
        let positional = Row::positional(&values);

        for i in 0..3 {
            assert_eq!(named.field_at(i), positional.field_at(i));
        }
        assert_eq!(named.key_at(0), Some(&FieldKey::Name("Subject".into())));
    }

    #[test]
    fn duplicate_headers_collapse() {
        let headers = record(&["Subject", "Note", "Start", "Note"]);
        let values = record(&["Meeting", "first", "2024-01-01", "second"]);
        let row = Row::with_headers(&headers, &values);

        assert_eq!(row.len(), 3);
        assert_eq!(row.field_at(0), Some("Meeting"));
        assert_eq!(row.field_at(1), Some("second"));
        assert_eq!(row.field_at(2), Some("2024-01-01"));
        assert_eq!(row.field_at(3), None);

        // Without headers every column is its own key
        let row = Row::positional(&values);
        assert_eq!(row.field_at(3), Some("second"));
    }

    #[test]
    fn extra_columns_past_headers_use_index_keys() {
        let headers = record(&["Subject"]);
        let values = record(&["Meeting", "extra"]);
        let row = Row::with_headers(&headers, &values);

        assert_eq!(row.key_at(1), Some(&FieldKey::Index(1)));
        assert_eq!(row.field_at(1), Some("extra"));
    }

    #[test]
    fn empty_record() {
        let row = Row::positional(&StringRecord::new());
        assert!(row.is_empty());
        assert_eq!(row.field_at(0), None);
    }
}
