//! Calendar dates as people type them, and publication-date filtering.

use chrono::NaiveDate;

use crate::{Article, CanonicalError};

/// Accepted layouts, tried in order. Day-first wins over month-first when both
/// parse (`"03-04-2024"` is 3 April).
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%m/%d/%Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Layout of `published_date` in article feeds.
const PUBLISHED_FORMAT: &str = "%Y-%m-%d";

/// Parse a user-supplied date in any of the accepted layouts.
pub fn parse_date(input: &str) -> Result<NaiveDate, CanonicalError> {
    let input = input.trim();

    if input.len() == 8 && input.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(date) = parse_compact(input) {
            return Ok(date);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .ok_or_else(|| CanonicalError::InvalidDate(input.to_string()))
}

/// `YYYYMMDD`.
fn parse_compact(digits: &str) -> Option<NaiveDate> {
    let year = digits[..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Rewrite a user-supplied date as `YYYY-MM-DD`.
///
/// ```rust
/// use canonical::normalize_date;
///
/// assert_eq!(normalize_date("Feb 14 2023").unwrap(), "2023-02-14");
/// assert_eq!(normalize_date("20230214").unwrap(), "2023-02-14");
/// assert!(normalize_date("someday").is_err());
/// ```
pub fn normalize_date(input: &str) -> Result<String, CanonicalError> {
    parse_date(input).map(|date| date.format(PUBLISHED_FORMAT).to_string())
}

/// Inclusive publication-date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Result<Self, CanonicalError> {
        if let (Some(since), Some(until)) = (since, until) {
            if since > until {
                return Err(CanonicalError::InvalidDateRange {
                    since: since.to_string(),
                    until: until.to_string(),
                });
            }
        }
        Ok(Self { since, until })
    }

    /// Build a range from user-typed bounds (see [`parse_date`]).
    pub fn parse(since: Option<&str>, until: Option<&str>) -> Result<Self, CanonicalError> {
        Self::new(
            since.map(parse_date).transpose()?,
            until.map(parse_date).transpose()?,
        )
    }

    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since.map_or(true, |since| since <= date)
            && self.until.map_or(true, |until| date <= until)
    }

    /// Whether an article passes the window. Articles whose `published_date`
    /// is not a `YYYY-MM-DD` date are kept.
    pub fn admits(&self, article: &Article) -> bool {
        match NaiveDate::parse_from_str(article.published_date.trim(), PUBLISHED_FORMAT) {
            Ok(date) => self.contains(date),
            Err(_) => true,
        }
    }
}

/// Keep the articles published inside `range`, in their original order.
pub fn filter_by_published_date(articles: Vec<Article>, range: &DateRange) -> Vec<Article> {
    if range.is_unbounded() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|article| range.admits(article))
        .collect()
}
