//! Layout validation errors.

use std::fmt;

use crate::Category;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A layout declared zero slots.
    EmptyLayout { category: Category },

    /// A slot kind range reaches past the layout's slot count.
    SlotOutOfRange {
        category: Category,
        slot: u16,
        count: u16,
    },

    /// The motion region does not fit inside the layout.
    MotionRegionOutOfRange {
        category: Category,
        start: u16,
        len: u16,
        count: u16,
    },

    /// A non-positional category was given a motion region.
    UnexpectedMotionRegion { category: Category },

    /// A positional category has no motion region.
    MissingMotionRegion { category: Category },

    /// The motion region kind does not match the category.
    MotionKindMismatch { category: Category },

    /// Two layouts were supplied for the same category.
    DuplicateCategory { category: Category },

    /// A layout table is missing a category.
    MissingCategory { category: Category },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLayout { category } => write!(f, "{category} layout has no slots"),
            Self::SlotOutOfRange {
                category,
                slot,
                count,
            } => write!(f, "{category} slot {slot} out of range for {count} slots"),
            Self::MotionRegionOutOfRange {
                category,
                start,
                len,
                count,
            } => write!(
                f,
                "{category} motion region {start}..{} exceeds {count} slots",
                u32::from(*start) + u32::from(*len)
            ),
            Self::UnexpectedMotionRegion { category } => {
                write!(f, "{category} is not positional but declares a motion region")
            }
            Self::MissingMotionRegion { category } => {
                write!(f, "{category} is positional but has no motion region")
            }
            Self::MotionKindMismatch { category } => {
                write!(f, "{category} motion region kind does not match category")
            }
            Self::DuplicateCategory { category } => {
                write!(f, "duplicate layout for {category}")
            }
            Self::MissingCategory { category } => write!(f, "no layout for {category}"),
        }
    }
}

impl std::error::Error for SchemaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_category_and_slot() {
        let err = SchemaError::SlotOutOfRange {
            category: Category::Unit,
            slot: 200,
            count: 134,
        };
        let msg = err.to_string();
        assert!(msg.contains("unit"));
        assert!(msg.contains("200"));
        assert!(msg.contains("134"));
    }

    #[test]
    fn display_motion_region_end() {
        let err = SchemaError::MotionRegionOutOfRange {
            category: Category::Corpse,
            start: 38,
            len: 4,
            count: 40,
        };
        assert!(err.to_string().contains("38..42"));
    }
}
