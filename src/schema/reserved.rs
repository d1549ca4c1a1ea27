//! Well-known field ids reserved for synthesized metadata columns
//!
//! These must never be assigned to a user column; the read-plan builder
//! (`crate::plan`) special-cases them.

/// Zero-based position of a row within the file it was read from
pub const ROW_POSITION: i32 = i32::MAX - 1;
/// Stable identifier of a row, persisted across files when row lineage is
/// tracked
pub const ROW_ID: i32 = i32::MAX - 2;
/// Sequence number of the last update that touched a row
pub const LAST_UPDATED_SEQUENCE_NUMBER: i32 = i32::MAX - 3;
/// Whether a row produced by a merge-on-read scan has been deleted
pub const IS_DELETED: i32 = i32::MAX - 4;
