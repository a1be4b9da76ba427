//! Moment-style date patterns, as used by the host to name periodic notes
//!
//! Only the tokens that make sense in a file name are supported:
//!
//! | Token         | Meaning                                   |
//! |---------------|-------------------------------------------|
//! | `YYYY` `YY`   | calendar year                             |
//! | `GGGG` `GG`   | ISO week-numbering year                   |
//! | `gggg` `gg`   | locale week-numbering year                |
//! | `WW` `W`      | ISO week                                  |
//! | `ww` `w`      | locale week                               |
//! | `MMMM` `MMM`  | month name (full, short)                  |
//! | `MM` `M`      | month number                              |
//! | `DDDD` `DDD`  | day of the year                           |
//! | `DD` `D`      | day of the month                          |
//! | `dddd` `ddd`  | weekday name (full, short)                |
//! | `[text]`      | literal text                              |
//!
//! Any other character is copied as is.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::settings::WeekStart;

/// Formats and parses dates with moment-style patterns
pub trait DateFormatter: Send + Sync {
    fn format(&self, date: NaiveDate, pattern: &str) -> String;
    /// Parses `input`, that must match `pattern` exactly and describe a valid date
    fn parse_strict(&self, input: &str, pattern: &str) -> Option<NaiveDate>;
}

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];
const MONTH_SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
const WEEKDAY_SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun, Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat,
];

/// How weeks are numbered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WeekRules {
    /// Weeks start on Monday, week 1 contains January 4th
    Iso,
    /// Weeks start on Sunday, week 1 contains January 1st
    SundayJanFirst,
}

impl WeekRules {
    fn for_week_start(week_start: WeekStart) -> Self {
        match week_start {
            WeekStart::Monday => WeekRules::Iso,
            WeekStart::Sunday | WeekStart::Locale => WeekRules::SundayJanFirst,
        }
    }

    /// First day of a week, counted from Sunday
    fn first_day(&self) -> u32 {
        match self {
            WeekRules::Iso => 1,
            WeekRules::SundayJanFirst => 0,
        }
    }

    fn first_week_start(year: i32) -> Option<NaiveDate> {
        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;
        Some(jan_first - Duration::days(jan_first.weekday().num_days_from_sunday() as i64))
    }

    /// Returns the week number and the week-numbering year of a date
    fn week_of(&self, date: NaiveDate) -> (u32, i32) {
        let iso = date.iso_week();
        if *self == WeekRules::Iso {
            return (iso.week(), iso.year());
        }

        let year = date.year();
        match (Self::first_week_start(year), Self::first_week_start(year + 1)) {
            (Some(_), Some(next)) if date >= next => (1, year + 1),
            (Some(start), _) => (((date - start).num_days() / 7 + 1) as u32, year),
            _ => (iso.week(), iso.year()),
        }
    }

    fn weeks_in_year(&self, year: i32) -> Option<u32> {
        match self {
            WeekRules::Iso => match NaiveDate::from_isoywd_opt(year, 53, Weekday::Mon) {
                Some(_) => Some(53),
                None => Some(52),
            },
            WeekRules::SundayJanFirst => {
                let days = (Self::first_week_start(year + 1)? - Self::first_week_start(year)?).num_days();
                Some((days / 7) as u32)
            },
        }
    }

    /// `weekday` is counted from Sunday
    fn date_from_week(&self, year: i32, week: u32, weekday: u32) -> Option<NaiveDate> {
        if week < 1 || week > self.weeks_in_year(year)? {
            return None;
        }
        match self {
            WeekRules::Iso => NaiveDate::from_isoywd_opt(year, week, *WEEKDAYS_FROM_SUNDAY.get(weekday as usize)?),
            WeekRules::SundayJanFirst => {
                let offset = 7 * (week as i64 - 1) + ((7 + weekday - self.first_day()) % 7) as i64;
                Some(Self::first_week_start(year)? + Duration::days(offset))
            },
        }
    }
}

/// Returns the first day of the week `date` is in
pub fn start_of_week(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let first_day = WeekRules::for_week_start(week_start).first_day();
    let offset = (7 + date.weekday().num_days_from_sunday() - first_day) % 7;
    date - Duration::days(offset as i64)
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Year4, Year2,
    IsoWeekYear4, IsoWeekYear2,
    WeekYear4, WeekYear2,
    MonthName, MonthShortName, Month2, Month,
    DayOfYear3, DayOfYear,
    Day2, Day,
    WeekdayName, WeekdayShortName,
    IsoWeek2, IsoWeek,
    Week2, Week,
}

// Longest tokens first
const FIELD_TOKENS: [(&str, Field); 20] = [
    ("YYYY", Field::Year4), ("GGGG", Field::IsoWeekYear4), ("gggg", Field::WeekYear4),
    ("MMMM", Field::MonthName), ("DDDD", Field::DayOfYear3), ("dddd", Field::WeekdayName),
    ("MMM", Field::MonthShortName), ("DDD", Field::DayOfYear), ("ddd", Field::WeekdayShortName),
    ("YY", Field::Year2), ("GG", Field::IsoWeekYear2), ("gg", Field::WeekYear2),
    ("MM", Field::Month2), ("DD", Field::Day2), ("WW", Field::IsoWeek2), ("ww", Field::Week2),
    ("M", Field::Month), ("D", Field::Day), ("W", Field::IsoWeek), ("w", Field::Week),
];

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(Field),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                literal.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        for (text, field) in FIELD_TOKENS.iter() {
            if rest.starts_with(text) {
                if literal.is_empty() == false {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field(*field));
                rest = &rest[text.len()..];
                continue 'outer;
            }
        }

        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if literal.is_empty() == false {
        tokens.push(Token::Literal(literal));
    }
    tokens
}


/// Components read from an input string
#[derive(Default, Debug)]
struct Parsed {
    year: Option<i32>,
    iso_week_year: Option<i32>,
    week_year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    ordinal: Option<u32>,
    iso_week: Option<u32>,
    week: Option<u32>,
    /// Counted from Sunday
    weekday: Option<u32>,
}

/// Reads between `min` and `max` ASCII digits
fn take_digits<'a>(input: &'a str, min: usize, max: usize) -> Option<(u32, &'a str)> {
    let len = input.bytes().take(max).take_while(|b| b.is_ascii_digit()).count();
    if len < min {
        return None;
    }
    let value = input[..len].parse().ok()?;
    Some((value, &input[len..]))
}

/// Reads the longest name of `names` that starts `input` (ignoring case), returns its index
fn take_name<'a>(input: &'a str, names: &[&str]) -> Option<(u32, &'a str)> {
    names.iter()
        .enumerate()
        .filter(|(_, name)| {
            input.get(..name.len())
                .map(|head| head.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
        .max_by_key(|(_, name)| name.len())
        .map(|(index, name)| (index as u32, &input[name.len()..]))
}

fn two_digit_year(yy: u32) -> i32 {
    yy as i32 + if yy > 68 { 1900 } else { 2000 }
}


/// A [`DateFormatter`] that understands the moment.js tokens used in note names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MomentFormatter {
    week_start: WeekStart,
}

impl MomentFormatter {
    pub fn new(week_start: WeekStart) -> Self {
        Self { week_start }
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    fn locale_rules(&self) -> WeekRules {
        WeekRules::for_week_start(self.week_start)
    }

    fn format_field(&self, date: NaiveDate, field: Field) -> String {
        let month0 = date.month0() as usize;
        let weekday = date.weekday().num_days_from_sunday() as usize;
        match field {
            Field::Year4 => format!("{:04}", date.year()),
            Field::Year2 => format!("{:02}", date.year().rem_euclid(100)),
            Field::IsoWeekYear4 => format!("{:04}", WeekRules::Iso.week_of(date).1),
            Field::IsoWeekYear2 => format!("{:02}", WeekRules::Iso.week_of(date).1.rem_euclid(100)),
            Field::WeekYear4 => format!("{:04}", self.locale_rules().week_of(date).1),
            Field::WeekYear2 => format!("{:02}", self.locale_rules().week_of(date).1.rem_euclid(100)),
            Field::MonthName => MONTH_NAMES[month0].to_string(),
            Field::MonthShortName => MONTH_SHORT_NAMES[month0].to_string(),
            Field::Month2 => format!("{:02}", date.month()),
            Field::Month => date.month().to_string(),
            Field::DayOfYear3 => format!("{:03}", date.ordinal()),
            Field::DayOfYear => date.ordinal().to_string(),
            Field::Day2 => format!("{:02}", date.day()),
            Field::Day => date.day().to_string(),
            Field::WeekdayName => WEEKDAY_NAMES[weekday].to_string(),
            Field::WeekdayShortName => WEEKDAY_SHORT_NAMES[weekday].to_string(),
            Field::IsoWeek2 => format!("{:02}", WeekRules::Iso.week_of(date).0),
            Field::IsoWeek => WeekRules::Iso.week_of(date).0.to_string(),
            Field::Week2 => format!("{:02}", self.locale_rules().week_of(date).0),
            Field::Week => self.locale_rules().week_of(date).0.to_string(),
        }
    }

    fn parse_field<'a>(field: Field, input: &'a str, parsed: &mut Parsed) -> Option<&'a str> {
        let (value, rest) = match field {
            Field::Year4 | Field::IsoWeekYear4 | Field::WeekYear4 => take_digits(input, 4, 4)?,
            Field::DayOfYear3 => take_digits(input, 3, 3)?,
            Field::DayOfYear => take_digits(input, 1, 3)?,
            Field::Year2 | Field::IsoWeekYear2 | Field::WeekYear2
                | Field::Month2 | Field::Day2 | Field::IsoWeek2 | Field::Week2 => take_digits(input, 2, 2)?,
            Field::Month | Field::Day | Field::IsoWeek | Field::Week => take_digits(input, 1, 2)?,
            Field::MonthName => take_name(input, &MONTH_NAMES)?,
            Field::MonthShortName => take_name(input, &MONTH_SHORT_NAMES)?,
            Field::WeekdayName => take_name(input, &WEEKDAY_NAMES)?,
            Field::WeekdayShortName => take_name(input, &WEEKDAY_SHORT_NAMES)?,
        };

        match field {
            Field::Year4 => parsed.year = Some(value as i32),
            Field::Year2 => parsed.year = Some(two_digit_year(value)),
            Field::IsoWeekYear4 => parsed.iso_week_year = Some(value as i32),
            Field::IsoWeekYear2 => parsed.iso_week_year = Some(two_digit_year(value)),
            Field::WeekYear4 => parsed.week_year = Some(value as i32),
            Field::WeekYear2 => parsed.week_year = Some(two_digit_year(value)),
            Field::MonthName | Field::MonthShortName => parsed.month = Some(value + 1),
            Field::Month2 | Field::Month => parsed.month = Some(value),
            Field::DayOfYear3 | Field::DayOfYear => parsed.ordinal = Some(value),
            Field::Day2 | Field::Day => parsed.day = Some(value),
            Field::WeekdayName | Field::WeekdayShortName => parsed.weekday = Some(value),
            Field::IsoWeek2 | Field::IsoWeek => parsed.iso_week = Some(value),
            Field::Week2 | Field::Week => parsed.week = Some(value),
        }
        Some(rest)
    }

    fn build_date(&self, parsed: &Parsed) -> Option<NaiveDate> {
        if let Some(week) = parsed.iso_week {
            let year = parsed.iso_week_year.or(parsed.week_year).or(parsed.year)?;
            let weekday = parsed.weekday.unwrap_or(WeekRules::Iso.first_day());
            return WeekRules::Iso.date_from_week(year, week, weekday);
        }

        if let Some(week) = parsed.week {
            let rules = self.locale_rules();
            let year = parsed.week_year.or(parsed.iso_week_year).or(parsed.year)?;
            let weekday = parsed.weekday.unwrap_or(rules.first_day());
            return rules.date_from_week(year, week, weekday);
        }

        let year = parsed.year.or(parsed.iso_week_year).or(parsed.week_year)?;
        let date = match parsed.ordinal {
            Some(ordinal) => NaiveDate::from_yo_opt(year, ordinal)?,
            None => NaiveDate::from_ymd_opt(year, parsed.month.unwrap_or(1), parsed.day.unwrap_or(1))?,
        };

        match parsed.weekday {
            Some(weekday) if weekday != date.weekday().num_days_from_sunday() => None,
            _ => Some(date),
        }
    }
}

impl DateFormatter for MomentFormatter {
    fn format(&self, date: NaiveDate, pattern: &str) -> String {
        tokenize(pattern).into_iter()
            .map(|token| match token {
                Token::Literal(text) => text,
                Token::Field(field) => self.format_field(date, field),
            })
            .collect()
    }

    fn parse_strict(&self, input: &str, pattern: &str) -> Option<NaiveDate> {
        let mut parsed = Parsed::default();
        let mut rest = input;
        for token in tokenize(pattern) {
            rest = match token {
                Token::Literal(text) => rest.strip_prefix(text.as_str())?,
                Token::Field(field) => Self::parse_field(field, rest, &mut parsed)?,
            };
        }
        if rest.is_empty() == false {
            return None;
        }
        self.build_date(&parsed)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tokenizing() {
        assert_eq!(tokenize("GGGG-[W]ww"), vec![
            Token::Field(Field::IsoWeekYear4),
            Token::Literal("-W".to_string()),
            Token::Field(Field::Week2),
        ]);
        assert_eq!(tokenize("[[x"), vec![Token::Literal("[[x".to_string())]);
        assert_eq!(tokenize("[Week] w"), vec![Token::Literal("Week ".to_string()), Token::Field(Field::Week)]);
    }

    #[test]
    fn calendar_tokens() {
        let f = MomentFormatter::default();
        assert_eq!(f.format(date(2024, 3, 5), "YYYY-MM-DD"), "2024-03-05");
        assert_eq!(f.format(date(2024, 3, 5), "ddd D MMM YY"), "Tue 5 Mar 24");
        assert_eq!(f.format(date(2024, 3, 5), "dddd, MMMM [the] D"), "Tuesday, March the 5");
        assert_eq!(f.format(date(2024, 3, 5), "YYYY/DDDD"), "2024/065");
    }

    #[test]
    fn iso_weeks() {
        let f = MomentFormatter::default();
        assert_eq!(f.format(date(2021, 1, 1), "GGGG-[W]WW"), "2020-W53");
        assert_eq!(f.format(date(2024, 12, 29), "GGGG-[W]WW"), "2024-W52");
        assert_eq!(f.format(date(2024, 12, 30), "GGGG-[W]W"), "2025-W1");
    }

    #[test]
    fn locale_weeks() {
        let sunday = MomentFormatter::new(WeekStart::Sunday);
        assert_eq!(sunday.format(date(2024, 3, 5), "gggg-[W]ww"), "2024-W10");
        assert_eq!(sunday.format(date(2024, 12, 29), "gggg-[W]ww"), "2025-W01");
        // The default weekly note format mixes an ISO year with a locale week
        assert_eq!(sunday.format(date(2024, 12, 29), "GGGG-[W]ww"), "2024-W01");

        let monday = MomentFormatter::new(WeekStart::Monday);
        assert_eq!(monday.format(date(2024, 12, 29), "GGGG-[W]ww"), "2024-W52");
    }

    #[test]
    fn strict_parsing() {
        let f = MomentFormatter::new(WeekStart::Sunday);
        assert_eq!(f.parse_strict("2024-03-05", "YYYY-MM-DD"), Some(date(2024, 3, 5)));
        assert_eq!(f.parse_strict("2024-02-29", "YYYY-MM-DD"), Some(date(2024, 2, 29)));
        assert_eq!(f.parse_strict("2023-02-29", "YYYY-MM-DD"), None);
        assert_eq!(f.parse_strict("2024-3-05", "YYYY-MM-DD"), None);
        assert_eq!(f.parse_strict("2024-03-05 copy", "YYYY-MM-DD"), None);
        assert_eq!(f.parse_strict("Tuesday 2024-03-05", "dddd YYYY-MM-DD"), Some(date(2024, 3, 5)));
        assert_eq!(f.parse_strict("monday 2024-03-05", "dddd YYYY-MM-DD"), None);
        assert_eq!(f.parse_strict("5 March 24", "D MMMM YY"), Some(date(2024, 3, 5)));
        assert_eq!(f.parse_strict("03-05", "MM-DD"), None);
    }

    #[test]
    fn strict_week_parsing() {
        let sunday = MomentFormatter::new(WeekStart::Sunday);
        assert_eq!(sunday.parse_strict("2024-W10", "GGGG-[W]ww"), Some(date(2024, 3, 3)));
        assert_eq!(sunday.parse_strict("2024-W10", "GGGG-[W]WW"), Some(date(2024, 3, 4)));
        assert_eq!(sunday.parse_strict("2022-W53", "gggg-[W]ww"), Some(date(2022, 12, 25)));
        assert_eq!(sunday.parse_strict("2024-W53", "gggg-[W]ww"), None);
        assert_eq!(sunday.parse_strict("2024-W00", "GGGG-[W]ww"), None);
        assert_eq!(sunday.parse_strict("2024-W1", "GGGG-[W]ww"), None);
        assert_eq!(sunday.parse_strict("2024-10", "GGGG-[W]ww"), None);
        assert_eq!(sunday.parse_strict("2020-W53", "GGGG-[W]WW"), Some(date(2020, 12, 28)));
    }

    #[test]
    fn week_starts() {
        assert_eq!(start_of_week(date(2024, 3, 5), WeekStart::Monday), date(2024, 3, 4));
        assert_eq!(start_of_week(date(2024, 3, 5), WeekStart::Sunday), date(2024, 3, 3));
        assert_eq!(start_of_week(date(2024, 3, 3), WeekStart::Locale), date(2024, 3, 3));
        assert_eq!(start_of_week(date(2024, 3, 3), WeekStart::Monday), date(2024, 2, 26));
    }
}
