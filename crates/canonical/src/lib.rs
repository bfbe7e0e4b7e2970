//! Text normalization for news metadata.
//!
//! Small, pure helpers that run before anything is embedded:
//!
//! - Whitespace collapsing.
//! - Person-name display order (`"Last, First"` → `"First Last"`).
//! - Reshaping raw article JSON into flat records with normalized facets.
//! - Date normalization (`"Feb 14 2023"` → `"2023-02-14"`) and inclusive
//!   publication-date windows.
//! - Stripping photo captions and credits from article text.
//!
//! No I/O, no clock calls. Same input, same output.

mod article;
mod caption;
mod date;
mod error;
mod person;
mod whitespace;

pub use crate::article::{parse_article, parse_articles, Article};
pub use crate::caption::remove_image_descriptions;
pub use crate::date::{filter_by_published_date, normalize_date, parse_date, DateRange};
pub use crate::error::CanonicalError;
pub use crate::person::normalize_person_name;
pub use crate::whitespace::collapse_whitespace;
