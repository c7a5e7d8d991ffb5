//! Date parsing for CSV date columns.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::event::EventTime;

/// Date-time layouts tried, in order, when no explicit format is configured.
const FLEXIBLE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, read as midnight.
const FLEXIBLE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Words that make natural-language input depend on the current date.
const RELATIVE_WORDS: &[&str] = &[
    "ago", "now", "today", "tomorrow", "yesterday", "next", "last", "this", "in",
];

const MONTH_NAMES: &[&str] = &[
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// One field of an explicit date format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    ShortYear,
    Month,
    MonthName,
    Day,
    Hour,
    Hour12,
    Minute,
    Second,
    AmPm,
    Offset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Field(Field),
    /// Letter kept from the pattern; matched if present, skipped otherwise
    Literal(char),
}

/// An explicit `--dateformat`, compiled from a strftime pattern.
///
/// Matching is forgiving: separators in the pattern match any run of
/// non-alphanumeric characters, input that stops after the date part reads
/// as midnight, and anything after the last field is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    tokens: Vec<Token>,
}

impl DateFormat {
    pub fn new(pattern: &str) -> Self {
        DateFormat {
            tokens: compile_strftime(pattern),
        }
    }

    fn parse(&self, input: &str) -> Option<EventTime> {
        let mut scan = Scanner::new(input);
        let mut fields = ParsedFields::default();

        for token in &self.tokens {
            match token {
                Token::Literal(c) => scan.eat_literal(*c),
                Token::Field(field) => {
                    // The sign of an offset is not a separator
                    if *field == Field::Offset {
                        scan.skip_whitespace();
                    } else {
                        scan.skip_separators();
                    }
                    if scan.at_end() || !fields.read(*field, &mut scan) {
                        break;
                    }
                }
            }
        }

        fields.into_event_time()
    }
}

/// Parses the start and end columns of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParser {
    /// Pattern given on the command line
    Format(DateFormat),
    /// Common ISO-like layouts, then natural language with an explicit year
    Flexible,
}

impl DateParser {
    /// Build a parser from the optional `--dateformat` value.
    ///
    /// A pattern without `%` is taken as moment-style tokens
    /// (`DD-MM-YYYY HH:mm`) and translated.
    pub fn new(format: Option<&str>) -> Self {
        match format {
            Some(f) if f.contains('%') => DateParser::Format(DateFormat::new(f)),
            Some(f) => DateParser::Format(DateFormat::new(&translate_moment_format(f))),
            None => DateParser::Flexible,
        }
    }

    /// Parse one field. `None` means the value is not a usable date.
    pub fn parse(&self, input: &str) -> Option<EventTime> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        match self {
            DateParser::Format(format) => format.parse(input),
            DateParser::Flexible => parse_flexible(input),
        }
    }
}

fn parse_flexible(input: &str) -> Option<EventTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(EventTime::Utc(dt.with_timezone(&Utc)));
    }

    for format in FLEXIBLE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(EventTime::Floating(dt));
        }
    }

    for format in FLEXIBLE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(input, format) {
            return Some(EventTime::Floating(d.and_time(NaiveTime::MIN)));
        }
    }

    parse_natural(input)
}

/// Natural-language fallback. Only absolute dates are accepted: the input
/// must name a four-digit year and no relative word, so the result never
/// depends on when the conversion runs.
fn parse_natural(input: &str) -> Option<EventTime> {
    if !has_explicit_year(input) || has_relative_word(input) {
        return None;
    }

    let dt = fuzzydate::parse(input).ok()?;

    if has_time_component(input) {
        Some(EventTime::Floating(dt))
    } else {
        Some(EventTime::Floating(dt.date().and_time(NaiveTime::MIN)))
    }
}

fn has_explicit_year(input: &str) -> bool {
    input
        .split(|c: char| !c.is_ascii_digit())
        .any(|digits| digits.len() == 4)
}

fn has_relative_word(input: &str) -> bool {
    input
        .to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .any(|word| RELATIVE_WORDS.contains(&word))
}

/// Check if the input contains a clock time (HH:MM or am/pm after a digit).
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();
    let bytes = lower.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' {
            let has_digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let has_digit_after = i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit();
            if has_digit_before && has_digit_after {
                return true;
            }
        }

        if (b == b'a' || b == b'p') && bytes.get(i + 1) == Some(&b'm') {
            if i > 0 && bytes[i - 1].is_ascii_digit() {
                return true;
            }
            if i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit() {
                return true;
            }
        }
    }

    false
}

/// Turn a strftime pattern into field tokens. Punctuation and spaces are
/// dropped since any separator matches any other.
fn compile_strftime(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            if c.is_alphanumeric() {
                tokens.push(Token::Literal(c));
            }
            continue;
        }

        // Padding flags (%-d, %_d, %0d) change nothing when reading
        while matches!(chars.peek(), Some('-' | '_' | '0')) {
            chars.next();
        }

        let fields: &[Field] = match chars.next() {
            Some('Y') => &[Field::Year],
            Some('y') => &[Field::ShortYear],
            Some('m') => &[Field::Month],
            Some('b' | 'B' | 'h') => &[Field::MonthName],
            Some('d' | 'e') => &[Field::Day],
            Some('H' | 'k') => &[Field::Hour],
            Some('I' | 'l') => &[Field::Hour12],
            Some('M') => &[Field::Minute],
            Some('S') => &[Field::Second],
            Some('p' | 'P') => &[Field::AmPm],
            Some('z') => &[Field::Offset],
            Some(':') if chars.peek() == Some(&'z') => {
                chars.next();
                &[Field::Offset]
            }
            Some('F') => &[Field::Year, Field::Month, Field::Day],
            Some('D') => &[Field::Month, Field::Day, Field::ShortYear],
            Some('R') => &[Field::Hour, Field::Minute],
            Some('T') => &[Field::Hour, Field::Minute, Field::Second],
            _ => &[],
        };
        tokens.extend(fields.iter().copied().map(Token::Field));
    }

    tokens
}

struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner { rest: input }
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn skip_separators(&mut self) {
        self.rest = self.rest.trim_start_matches(|c: char| !c.is_alphanumeric());
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat_literal(&mut self, c: char) {
        if let Some(first) = self.rest.chars().next() {
            if first.eq_ignore_ascii_case(&c) {
                self.rest = &self.rest[first.len_utf8()..];
            }
        }
    }

    /// Read between 1 and `max` ASCII digits.
    fn digits(&mut self, max: usize) -> Option<u32> {
        let len = self
            .rest
            .bytes()
            .take(max)
            .take_while(u8::is_ascii_digit)
            .count();
        if len == 0 {
            return None;
        }
        let value = self.rest[..len].parse().ok()?;
        self.rest = &self.rest[len..];
        Some(value)
    }

    fn word(&mut self) -> Option<&'a str> {
        let len = self
            .rest
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(self.rest.len());
        if len == 0 {
            return None;
        }
        let (word, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(word)
    }

    fn offset(&mut self) -> Option<i32> {
        let sign = match self.rest.chars().next()? {
            '+' => 1,
            '-' => -1,
            'Z' | 'z' => {
                self.rest = &self.rest[1..];
                return Some(0);
            }
            _ => return None,
        };
        self.rest = &self.rest[1..];
        let hours = self.digits(2)? as i32;
        self.rest = self.rest.strip_prefix(':').unwrap_or(self.rest);
        let minutes = self.digits(2).unwrap_or(0) as i32;
        Some(sign * (hours * 3600 + minutes * 60))
    }
}

#[derive(Debug, Default)]
struct ParsedFields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    hour12: Option<u32>,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
    offset: Option<i32>,
}

impl ParsedFields {
    /// Read one field. Returns false when the input does not hold it.
    fn read(&mut self, field: Field, scan: &mut Scanner<'_>) -> bool {
        let read = match field {
            Field::Year => scan.digits(4).map(|v| self.year = Some(v as i32)),
            // Same pivot as moment: 00-68 is 20xx, 69-99 is 19xx
            Field::ShortYear => scan.digits(2).map(|v| {
                let v = v as i32;
                self.year = Some(if v < 69 { 2000 + v } else { 1900 + v });
            }),
            Field::Month => scan.digits(2).map(|v| self.month = Some(v)),
            Field::MonthName => scan.word().and_then(month_from_name).map(|v| self.month = Some(v)),
            Field::Day => scan.digits(2).map(|v| self.day = Some(v)),
            Field::Hour => scan.digits(2).map(|v| self.hour = Some(v)),
            Field::Hour12 => scan.digits(2).map(|v| self.hour12 = Some(v)),
            Field::Minute => scan.digits(2).map(|v| self.minute = Some(v)),
            Field::Second => scan.digits(2).map(|v| self.second = Some(v)),
            Field::AmPm => scan.word().and_then(am_pm).map(|pm| self.pm = Some(pm)),
            Field::Offset => scan.offset().map(|v| self.offset = Some(v)),
        };
        read.is_some()
    }

    fn into_event_time(self) -> Option<EventTime> {
        let date = NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)?;

        let hour = match (self.hour12, self.pm) {
            (Some(h), Some(true)) if h < 12 => h + 12,
            (Some(12), Some(false)) => 0,
            (Some(h), _) => h,
            (None, _) => self.hour.unwrap_or(0),
        };
        let time = NaiveTime::from_hms_opt(hour, self.minute.unwrap_or(0), self.second.unwrap_or(0))?;
        let datetime = date.and_time(time);

        match self.offset {
            Some(seconds) => {
                let offset = FixedOffset::east_opt(seconds)?;
                let dt = offset.from_local_datetime(&datetime).single()?;
                Some(EventTime::Utc(dt.with_timezone(&Utc)))
            }
            None => Some(EventTime::Floating(datetime)),
        }
    }
}

fn month_from_name(word: &str) -> Option<u32> {
    let lower = word.to_lowercase();
    let prefix = lower.get(..3)?;
    MONTH_NAMES
        .iter()
        .position(|name| *name == prefix)
        .map(|i| i as u32 + 1)
}

fn am_pm(word: &str) -> Option<bool> {
    match word.to_lowercase().as_str() {
        "am" | "a" => Some(false),
        "pm" | "p" => Some(true),
        _ => None,
    }
}

/// Translate moment.js-style tokens (`YYYY`, `MM`, `DD`, `HH`, `mm`, ...)
/// into a chrono strftime pattern. Text inside `[...]` is kept literally.
pub fn translate_moment_format(format: &str) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '[' {
            let mut j = i + 1;
            while j < chars.len() && chars[j] != ']' {
                push_literal(&mut out, chars[j]);
                j += 1;
            }
            i = j + 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        match moment_token(c, run) {
            Some(spec) => out.push_str(spec),
            None => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
            }
        }
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn moment_token(c: char, run: usize) -> Option<&'static str> {
    let spec = match (c, run) {
        ('Y', 4) => "%Y",
        ('Y', 2) => "%y",
        ('M', 4) => "%B",
        ('M', 3) => "%b",
        ('M', 1 | 2) => "%m",
        ('D', 1 | 2) => "%d",
        ('H', 1 | 2) => "%H",
        ('h', 1 | 2) => "%I",
        ('m', 1 | 2) => "%M",
        ('s', 1 | 2) => "%S",
        ('A' | 'a', 1) => "%p",
        ('Z', 1) => "%:z",
        ('Z', 2) => "%z",
        _ => return None,
    };
    Some(spec)
}
