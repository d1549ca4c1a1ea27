//! The value-reader tree: one [`ValueReader`] per projected field, assembled
//! into a plan by [`crate::plan`] and walked once per row
//!
//! Every concrete reader in this module is a small, independently testable
//! unit: one file per family of logical type, each exposing a plain struct
//! that holds only the state it needs (a fixed-size length, a scale, a child
//! reader) and nothing else.

pub mod constant;
pub mod container;
pub mod logical;
pub mod positional;
pub mod primitive;
pub mod skip_struct;
pub mod struct_reader;

use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

/// Reads one Avro-encoded value, optionally reusing a previously materialized
/// [`Value`] to avoid allocating
///
/// Object-safe by construction (`&mut dyn Decoder`, not `&mut impl Decoder`)
/// so a read plan can hold a `Vec<Box<dyn ValueReader>>` of otherwise
/// unrelated concrete reader types.
///
/// Reuse is always a hint: a reader may ignore `reuse` and allocate fresh,
/// and callers must never rely on reuse happening for correctness, only for
/// performance. Bytes and decimal readers never honor it, by design (see
/// `primitive::BytesReader` and `logical::DecimalReader`).
pub trait ValueReader {
	fn read(
		&mut self,
		decoder: &mut dyn Decoder,
		reuse: Option<Value>,
	) -> Result<Value, DecodeError>;

	/// Skip this value without materializing it
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError>;
}

impl ValueReader for Box<dyn ValueReader> {
	fn read(
		&mut self,
		decoder: &mut dyn Decoder,
		reuse: Option<Value>,
	) -> Result<Value, DecodeError> {
		(**self).read(decoder, reuse)
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		(**self).skip(decoder)
	}
}

/// A [`ValueReader`] that can be told how to produce the current row's
/// position, for readers synthesizing `_pos`/`_row_id`-style metadata columns
/// that have no physical counterpart in the writer schema
///
/// The caller (typically whatever drives the top-level struct read) injects
/// the supplier once, after the plan is built, rather than the reader trying
/// to track position itself: the supplier is the single source of truth for
/// "what row are we on", shared across every positional reader in the plan.
pub trait SupportsRowPosition {
	fn set_row_position_supplier(&mut self, supplier: Box<dyn FnMut() -> i64>);
}
