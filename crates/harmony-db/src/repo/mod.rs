//! Typed data access for each entity.
//!
//! Every function is generic over [`sea_orm::ConnectionTrait`] so callers can
//! pass either the pool or an open transaction.

use chrono::{DateTime, FixedOffset};

pub mod artists;
pub mod musics;
pub mod profiles;
pub mod tokens;
pub mod users;

use crate::entities::{music::Genre, Gender};

/// One page of rows plus the total row count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Values that an update request may send "empty" to mean "leave unchanged".
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for &str {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for i32 {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for i64 {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for DateTime<FixedOffset> {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for Gender {
    fn is_blank(&self) -> bool {
        false
    }
}

impl Blank for Genre {
    fn is_blank(&self) -> bool {
        false
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        match self {
            Some(value) => value.is_blank(),
            None => true,
        }
    }
}

/// Take `supplied` when it carries a non-blank value, otherwise keep `current`.
pub fn merge_field<T: Blank>(supplied: Option<T>, current: T) -> T {
    match supplied {
        Some(value) if !value.is_blank() => value,
        _ => current,
    }
}

/// [`merge_field`] for nullable columns.
pub fn merge_option<T: Blank>(supplied: Option<T>, current: Option<T>) -> Option<T> {
    merge_field(supplied.map(Some), current)
}

/// Normalise 1-based `page` and `page_size` into a zero-based page index and
/// a non-zero size. The index is capped so `index * size` never exceeds
/// `i64::MAX`; pages past the data come back empty.
pub fn page_bounds(page: u64, page_size: u64) -> (u64, u64) {
    let size = page_size.max(1);
    let index = (page.max(1) - 1).min(i64::MAX as u64 / size);
    (index, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_field_takes_supplied_value() {
        assert_eq!(merge_field(Some("new".to_string()), "old".to_string()), "new");
    }

    #[test]
    fn test_merge_field_keeps_current_when_absent_or_empty() {
        assert_eq!(merge_field(None, "old".to_string()), "old");
        assert_eq!(merge_field(Some(String::new()), "old".to_string()), "old");
    }

    #[test]
    fn test_merge_field_zero_counts_as_supplied() {
        assert_eq!(merge_field(Some(0), 12), 0);
    }

    #[test]
    fn test_merge_option_nullable_columns() {
        assert_eq!(
            merge_option(Some("Kathmandu".to_string()), None),
            Some("Kathmandu".to_string())
        );
        assert_eq!(
            merge_option(Some(String::new()), Some("Pokhara".to_string())),
            Some("Pokhara".to_string())
        );
        assert_eq!(merge_option::<String>(None, None), None);
    }

    #[test]
    fn test_page_bounds_clamps() {
        assert_eq!(page_bounds(0, 0), (0, 1));
        assert_eq!(page_bounds(3, 10), (2, 10));
    }

    #[test]
    fn test_page_bounds_offset_never_overflows() {
        for size in [1, 10, 100, u64::MAX] {
            let (index, size) = page_bounds(u64::MAX, size);
            let offset = index.checked_mul(size).expect("offset fits u64");
            assert!(offset <= i64::MAX as u64);
        }
    }

    #[test]
    fn test_merge_enum() {
        assert_eq!(merge_field(Some(Gender::Others), Gender::Male), Gender::Others);
        assert_eq!(merge_field(None, Genre::Jazz), Genre::Jazz);
    }
}
