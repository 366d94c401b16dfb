use crate::error::{CollectorError, Result};

/// Lazy, ascending iterator over `yyyymmdd` tokens between two bounds,
/// inclusive. Walks the calendar year by year and filters against the raw
/// bounds with string comparison, so an out-of-range bound simply narrows
/// the output instead of failing.
pub struct DateRange {
    start: String,
    end: String,
    year: i32,
    last_year: i32,
    month: u32,
    day: u32,
}

impl DateRange {
    pub fn new(start: &str, end: &str) -> Result<Self> {
        let first_year = parse_year(start)?;
        let last_year = parse_year(end)?;

        Ok(Self {
            start: start.to_string(),
            end: end.to_string(),
            year: first_year,
            last_year,
            month: 1,
            day: 1,
        })
    }
}

impl Iterator for DateRange {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.year > self.last_year {
                return None;
            }

            let token = format!("{:04}{:02}{:02}", self.year, self.month, self.day);

            // Advance before yielding so the next call resumes cleanly
            if self.day < days_in_month(self.month, self.year) {
                self.day += 1;
            } else if self.month < 12 {
                self.month += 1;
                self.day = 1;
            } else {
                self.year += 1;
                self.month = 1;
                self.day = 1;
            }

            if token.as_str() >= self.start.as_str() && token.as_str() <= self.end.as_str() {
                return Some(token);
            }
            if token.as_str() > self.end.as_str() {
                return None;
            }
        }
    }
}

fn parse_year(token: &str) -> Result<i32> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CollectorError::MalformedDate(token.to_string()));
    }
    token[..4]
        .parse()
        .map_err(|_| CollectorError::MalformedDate(token.to_string()))
}

/// Leap years on the archive are counted in steps of four from 2008, the
/// first year with published data. Years before the anchor never leap.
pub fn is_leap_year(year: i32) -> bool {
    year >= 2008 && (year - 2008) % 4 == 0
}

pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(start: &str, end: &str) -> usize {
        DateRange::new(start, end).unwrap().count()
    }

    #[test]
    fn test_full_leap_year_has_366_days() {
        assert_eq!(count("20200101", "20201231"), 366);
    }

    #[test]
    fn test_full_common_year_has_365_days() {
        assert_eq!(count("20190101", "20191231"), 365);
    }

    #[test]
    fn test_single_day_range() {
        let dates: Vec<String> = DateRange::new("20190615", "20190615").unwrap().collect();
        assert_eq!(dates, vec!["20190615".to_string()]);
    }

    #[test]
    fn test_start_after_end_is_empty() {
        assert_eq!(count("20200101", "20191231"), 0);
    }

    #[test]
    fn test_crosses_month_boundary() {
        // Jan 15..31 (17 days) + Feb 1..15 (15 days)
        assert_eq!(count("20200115", "20200215"), 32);
    }

    #[test]
    fn test_ascending_order() {
        let dates: Vec<String> = DateRange::new("20191228", "20200103").unwrap().collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates.first().unwrap(), "20191228");
        assert_eq!(dates.last().unwrap(), "20200103");
    }

    #[test]
    fn test_leap_rule_anchored_at_2008() {
        assert!(is_leap_year(2008));
        assert!(is_leap_year(2012));
        assert!(is_leap_year(2020));
        assert!(!is_leap_year(2010));
        // Years before the anchor never leap under the archive rule
        assert!(!is_leap_year(2004));
    }

    #[test]
    fn test_february_29_only_in_anchored_leap_years() {
        let feb_2020: Vec<String> = DateRange::new("20200201", "20200229").unwrap().collect();
        assert_eq!(feb_2020.len(), 29);
        let feb_2019: Vec<String> = DateRange::new("20190201", "20190229").unwrap().collect();
        assert_eq!(feb_2019.len(), 28);
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(DateRange::new("2020-01-01", "20200110").is_err());
        assert!(DateRange::new("20200101", "january").is_err());
    }
}
