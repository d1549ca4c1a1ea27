//! Readers for synthesized positional metadata columns: `_pos`, `_row_id`,
//! and the last-updated sequence number
//!
//! None of these have a physical counterpart in the writer schema; they are
//! installed by the read-plan builder whenever the expected schema asks for
//! one of the reserved field ids in [`crate::schema::reserved`]. They don't
//! read bytes themselves, but several of them need to know which row is
//! currently being materialized, which is threaded in after the fact via
//! [`SupportsRowPosition`] rather than tracked independently by each reader -
//! there is exactly one row cursor per struct read, shared by every
//! positional reader in that struct's plan.

use std::cell::Cell;
use std::rc::Rc;

use super::{SupportsRowPosition, ValueReader};
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

/// A shared, monotonically increasing row cursor
///
/// The top-level [`PlannedStructReader`](super::struct_reader::PlannedStructReader)
/// for a row - the one built with
/// [`PlannedStructReader::with_row_cursor`](super::struct_reader::PlannedStructReader::with_row_cursor) -
/// advances one of these once per row read; [`PositionReader`],
/// [`RowIdReader`] and other positional readers read from it via the supplier
/// closure they're handed through [`SupportsRowPosition`]. Nested struct
/// readers share the same cursor but never advance it themselves.
#[derive(Debug, Clone, Default)]
pub struct RowCursor(Rc<Cell<i64>>);

impl RowCursor {
	pub fn new(start: i64) -> Self {
		Self(Rc::new(Cell::new(start)))
	}

	pub fn get(&self) -> i64 {
		self.0.get()
	}

	pub fn advance(&self) {
		self.0.set(self.0.get() + 1);
	}

	/// A supplier closure suitable for [`SupportsRowPosition::set_row_position_supplier`]
	pub fn supplier(&self) -> Box<dyn FnMut() -> i64> {
		let cursor = self.clone();
		Box::new(move || cursor.get())
	}
}

/// `_pos`: the zero-based position of the current row within the file
///
/// Strictly increasing by construction, since it just reflects the shared
/// [`RowCursor`] the enclosing struct reader advances every row.
pub struct PositionReader {
	supplier: Option<Box<dyn FnMut() -> i64>>,
}

impl Default for PositionReader {
	fn default() -> Self {
		Self { supplier: None }
	}
}

impl SupportsRowPosition for PositionReader {
	fn set_row_position_supplier(&mut self, supplier: Box<dyn FnMut() -> i64>) {
		self.supplier = Some(supplier);
	}
}

impl ValueReader for PositionReader {
	fn read(&mut self, _decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		let supplier = self
			.supplier
			.as_mut()
			.expect("PositionReader used before a row position supplier was installed");
		Ok(Value::Long(supplier()))
	}
	fn skip(&mut self, _decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		Ok(())
	}
}

/// `_row_id`: a stable identifier for the row
///
/// When the writer schema carries a physical row-id column, `physical` reads
/// it; a `null` physical value (or no physical column at all) falls back to
/// `base_row_id + position`.
pub struct RowIdReader {
	base_row_id: i64,
	physical: Option<Box<dyn ValueReader>>,
	supplier: Option<Box<dyn FnMut() -> i64>>,
}

impl RowIdReader {
	pub fn new(base_row_id: i64) -> Self {
		Self {
			base_row_id,
			physical: None,
			supplier: None,
		}
	}

	/// Composes the fallback with a physical `_row_id` column: its value wins
	/// whenever it isn't `null`.
	pub fn with_physical(base_row_id: i64, physical: Box<dyn ValueReader>) -> Self {
		Self {
			base_row_id,
			physical: Some(physical),
			supplier: None,
		}
	}
}

impl SupportsRowPosition for RowIdReader {
	fn set_row_position_supplier(&mut self, supplier: Box<dyn FnMut() -> i64>) {
		self.supplier = Some(supplier);
	}
}

impl ValueReader for RowIdReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		if let Some(physical) = &mut self.physical {
			let value = physical.read(decoder, reuse)?;
			if !matches!(value, Value::Null) {
				return Ok(value);
			}
		}
		let supplier = self
			.supplier
			.as_mut()
			.expect("RowIdReader used before a row position supplier was installed");
		Ok(Value::Long(self.base_row_id + supplier()))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		if let Some(physical) = &mut self.physical {
			physical.skip(decoder)?;
		}
		Ok(())
	}
}

/// The sequence number of the last update that touched the rows of this file
///
/// `base_row_id` is accepted at construction because the caller only knows
/// how to build this reader where it also knows the file's row-id base (the
/// two come from the same manifest entry), but the value itself is never
/// consulted again once construction succeeds outside of the doc comment on
/// [`Self::with_physical`]: absent a physical column, this reader always just
/// returns the constant sequence number for the file, the same for every row.
///
/// When the writer schema carries a physical `_last_updated_sequence_number`
/// column, `physical` reads it; a `null` physical value falls back to the
/// constant `sequence_number`.
pub struct LastUpdatedSeqReader {
	_base_row_id: i64,
	sequence_number: i64,
	physical: Option<Box<dyn ValueReader>>,
}

impl LastUpdatedSeqReader {
	pub fn new(base_row_id: i64, sequence_number: i64) -> Self {
		Self {
			_base_row_id: base_row_id,
			sequence_number,
			physical: None,
		}
	}

	pub fn with_physical(base_row_id: i64, sequence_number: i64, physical: Box<dyn ValueReader>) -> Self {
		Self {
			_base_row_id: base_row_id,
			sequence_number,
			physical: Some(physical),
		}
	}
}

impl ValueReader for LastUpdatedSeqReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		if let Some(physical) = &mut self.physical {
			let value = physical.read(decoder, reuse)?;
			if !matches!(value, Value::Null) {
				return Ok(value);
			}
		}
		Ok(Value::Long(self.sequence_number))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		if let Some(physical) = &mut self.physical {
			physical.skip(decoder)?;
		}
		Ok(())
	}
}
