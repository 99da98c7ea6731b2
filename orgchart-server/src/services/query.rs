//! Search and sort parsing for employee listings
//!
//! A search term that reads as a date becomes an inclusive hire-date range;
//! anything else is a case-insensitive substring match over name, email and
//! position name.

use chrono::{Datelike, Months, NaiveDate};

use crate::utils::AppError;

/// Parsed `?q=` term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// Inclusive on both ends
    HireDate { from: NaiveDate, to: NaiveDate },
    Text(String),
}

impl SearchFilter {
    /// Blank terms mean no filter
    pub fn parse(q: &str) -> Option<Self> {
        let q = q.trim();
        if q.is_empty() {
            return None;
        }
        Some(match parse_date_range(q) {
            Some((from, to)) => SearchFilter::HireDate { from, to },
            None => SearchFilter::Text(q.to_string()),
        })
    }
}

fn is_year(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_month(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Date range implied by a search term
///
/// - `YYYY` covers the whole year
/// - `YYYY-MM` covers the whole month
/// - `YYYY-MM-DD`, `DD.MM.YYYY`, `DD/MM/YYYY` cover that single day
pub fn parse_date_range(q: &str) -> Option<(NaiveDate, NaiveDate)> {
    if is_year(q) {
        let year: i32 = q.parse().ok()?;
        return Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ));
    }

    if let Some((y, m)) = q.split_once('-')
        && is_year(y)
        && is_month(m)
    {
        let first = NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1)?;
        let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
        return Some((first, last));
    }

    for format in ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(q, format)
            && (1000..=9999).contains(&day.year())
        {
            return Some((day, day));
        }
    }
    None
}

/// Sortable employee columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    FullName,
    Email,
    HireDate,
    Position,
    Supervisor,
    Id,
}

impl SortField {
    fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "full_name" => SortField::FullName,
            "email" => SortField::Email,
            "hire_date" => SortField::HireDate,
            "position" => SortField::Position,
            "supervisor" => SortField::Supervisor,
            "id" => SortField::Id,
            _ => return None,
        })
    }

    /// Column expression over the `e` / `p` / `s` aliases of the listing query
    fn column(&self) -> &'static str {
        match self {
            SortField::FullName => "e.full_name COLLATE NOCASE",
            SortField::Email => "e.email COLLATE NOCASE",
            SortField::HireDate => "e.hire_date",
            SortField::Position => "p.name COLLATE NOCASE",
            SortField::Supervisor => "s.full_name COLLATE NOCASE",
            SortField::Id => "e.id",
        }
    }
}

/// Parsed `?sort=` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::FullName,
            descending: false,
        }
    }
}

impl SortSpec {
    /// `None` or blank gives the default (name ascending); unknown keys are
    /// a validation error.
    pub fn parse(sort: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = sort.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };
        let (descending, key) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = SortField::from_key(key).ok_or_else(|| {
            AppError::validation(format!("Unknown sort key: {key}")).with_detail("sort", raw)
        })?;
        Ok(Self { field, descending })
    }

    /// `ORDER BY` body; ties fall back to `e.id` so pages are stable
    pub fn order_by(&self) -> String {
        let dir = if self.descending { "DESC" } else { "ASC" };
        if self.field == SortField::Id {
            format!("e.id {dir}")
        } else {
            format!("{} {dir}, e.id ASC", self.field.column())
        }
    }
}

/// Escapes `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
