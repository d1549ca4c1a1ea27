//! The byte-oriented `Decoder` abstraction consumed by the value-reader tree
//!
//! This is the external collaborator the rest of the crate is built against:
//! the framing/container format, compression and file-level plumbing that
//! would normally produce a stream of these calls are out of scope here (see
//! the crate-level docs). [`binary`] provides a concrete implementation over
//! raw Avro binary encoding so the rest of the crate is testable standalone.

mod binary;

pub use binary::BinaryDecoder;

use crate::error::DecodeError;

/// A byte-oriented cursor over a single Avro-encoded value stream
///
/// Implementations are free to borrow from the underlying buffer (as
/// [`BinaryDecoder`] does over a slice) or to copy into scratch space (as
/// [`BinaryDecoder`] does over an arbitrary [`std::io::Read`]).
pub trait Decoder {
	fn read_null(&mut self) -> Result<(), DecodeError>;
	fn read_boolean(&mut self) -> Result<bool, DecodeError>;
	fn read_int(&mut self) -> Result<i32, DecodeError>;
	fn read_long(&mut self) -> Result<i64, DecodeError>;
	fn read_float(&mut self) -> Result<f32, DecodeError>;
	fn read_double(&mut self) -> Result<f64, DecodeError>;
	/// `reuse`, if supplied, may be cleared and refilled instead of allocating
	fn read_string(&mut self, reuse: Option<String>) -> Result<String, DecodeError>;
	/// `reuse`, if supplied, may be cleared and refilled instead of allocating
	fn read_bytes(&mut self, reuse: Option<Vec<u8>>) -> Result<Vec<u8>, DecodeError>;
	fn read_fixed(&mut self, dst: &mut [u8]) -> Result<(), DecodeError>;
	/// Returns the ordinal of the enum symbol that was written
	fn read_enum(&mut self) -> Result<usize, DecodeError>;
	/// Returns the branch index of a union that was written
	fn read_index(&mut self) -> Result<usize, DecodeError>;

	/// Returns the number of elements in the next chunk (0 terminates the array)
	fn read_array_start(&mut self) -> Result<i64, DecodeError>;
	/// Returns the number of elements in the next chunk after the current one is exhausted
	fn array_next(&mut self) -> Result<i64, DecodeError>;
	/// Returns the number of entries in the next chunk (0 terminates the map)
	fn read_map_start(&mut self) -> Result<i64, DecodeError>;
	/// Returns the number of entries in the next chunk after the current one is exhausted
	fn map_next(&mut self) -> Result<i64, DecodeError>;

	fn skip_boolean(&mut self) -> Result<(), DecodeError> {
		self.read_boolean().map(drop)
	}
	fn skip_int(&mut self) -> Result<(), DecodeError> {
		self.read_int().map(drop)
	}
	fn skip_long(&mut self) -> Result<(), DecodeError> {
		self.read_long().map(drop)
	}
	fn skip_float(&mut self) -> Result<(), DecodeError> {
		self.read_float().map(drop)
	}
	fn skip_double(&mut self) -> Result<(), DecodeError> {
		self.read_double().map(drop)
	}
	fn skip_string(&mut self) -> Result<(), DecodeError>;
	fn skip_bytes(&mut self) -> Result<(), DecodeError>;
	fn skip_fixed(&mut self, len: usize) -> Result<(), DecodeError>;
	fn skip_enum(&mut self) -> Result<(), DecodeError> {
		self.read_enum().map(drop)
	}

	/// Per the Avro block-skipping contract: a non-zero return means "skip the
	/// wrapped element reader this many times, then call `skip_array` again";
	/// zero means the array is fully consumed. Blocks that carry an explicit
	/// byte-size prefix are skipped in one shot without the caller's
	/// involvement, and are transparent to the caller (never surface as a
	/// non-zero return for that block).
	fn skip_array(&mut self) -> Result<i64, DecodeError>;
	/// See [`Decoder::skip_array`]
	fn skip_map(&mut self) -> Result<i64, DecodeError>;
}

/// A single entry of [`ResolvingDecoder::read_field_order`]: the writer-order
/// name and physical position of one field of the writer's record schema
#[derive(Debug, Clone)]
pub struct WriterField {
	pub name: String,
	pub position: usize,
}

/// A [`Decoder`] that is also aware of both the writer and reader schema, and
/// so can hand back the order in which the writer actually wrote record
/// fields (which need not match the reader's expected order)
pub trait ResolvingDecoder: Decoder {
	fn read_field_order(&self) -> &[WriterField];
}
