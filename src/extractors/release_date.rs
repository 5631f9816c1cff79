use chrono::{Datelike, NaiveDate};

/// Two digit years at or above this value belong to the 1900s, the rest to the
/// 2000s (`68` is 2068, `69` is 1969).
pub const CENTURY_PIVOT: u32 = 69;

/// Parses a strict `DD/MM/YY` date. Each component must be exactly two ASCII
/// digits and the result must be a real calendar date.
pub fn parse_release_date<B: AsRef<[u8]>>(value: B) -> Option<NaiveDate> {
    let bytes = value.as_ref();
    if bytes.len() != 8 || bytes[2] != b'/' || bytes[5] != b'/' {
        return None;
    }

    let day = two_digits(&bytes[0..2])?;
    let month = two_digits(&bytes[3..5])?;
    let short_year = two_digits(&bytes[6..8])?;

    let year = if short_year >= CENTURY_PIVOT {
        1900 + short_year
    } else {
        2000 + short_year
    };

    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn two_digits(pair: &[u8]) -> Option<u32> {
    match pair {
        [tens @ b'0'..=b'9', units @ b'0'..=b'9'] => {
            Some(u32::from(tens - b'0') * 10 + u32::from(units - b'0'))
        }
        _ => None,
    }
}

/// Years strictly after `after` and up to and including `through`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub after: i32,
    pub through: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange {
            after: 2014,
            through: 2024,
        }
    }
}

impl YearRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        let year = date.year();
        year > self.after && year <= self.through
    }
}
