//! Readers for Avro `record`s projected onto an expected struct shape
//!
//! Two flavors, matching the two ways Avro schema resolution can be driven
//! (see the crate-level design notes): [`StructReader`] walks whatever order
//! a [`ResolvingDecoder`] reports at read time, which is how Apache Avro's
//! own `ResolvingDecoder.readFieldOrder()` works and is kept here as the
//! legacy/interop path; [`PlannedStructReader`] walks a plan computed once,
//! ahead of time, by [`crate::plan`], and is the fast path this crate
//! actually wants callers to use.

use super::ValueReader;
use crate::decoder::{Decoder, ResolvingDecoder};
use crate::error::DecodeError;
use crate::value::{GenericRecord, RecordFactory, Value};

/// One physical writer field's destination: either materialize it at a given
/// position of the expected struct, or skip it (it has no counterpart in the
/// expected schema)
pub enum FieldSlot {
	Read {
		/// Position within the expected struct
		position: usize,
		reader: Box<dyn ValueReader>,
	},
	Skip(Box<dyn ValueReader>),
}

/// Drives a [`ResolvingDecoder`] through its own reported field order
///
/// `slots` is indexed by the physical writer position (the same indices
/// [`ResolvingDecoder::read_field_order`] reports), not by expected-struct
/// position.
pub struct StructReader<F: RecordFactory> {
	slots: Vec<FieldSlot>,
	expected_len: usize,
	factory: F,
}

impl<F: RecordFactory> StructReader<F> {
	pub fn new(slots: Vec<FieldSlot>, expected_len: usize, factory: F) -> Self {
		Self {
			slots,
			expected_len,
			factory,
		}
	}

	/// Generic over the concrete [`ResolvingDecoder`] implementation (rather
	/// than `&mut dyn ResolvingDecoder`) so the field readers inside can be
	/// handed a plain `&mut dyn Decoder` via ordinary unsizing, without
	/// needing to upcast from one trait object to another.
	pub fn read_into<D: ResolvingDecoder>(
		&mut self,
		decoder: &mut D,
		reuse: Option<F::Target>,
	) -> Result<F::Target, DecodeError> {
		let mut target = reuse.unwrap_or_else(|| self.factory.create(self.expected_len));
		let order: Vec<usize> = decoder.read_field_order().iter().map(|f| f.position).collect();
		for writer_position in order {
			match self.slots.get_mut(writer_position) {
				Some(FieldSlot::Read { position, reader }) => {
					let slot = self.factory.get(&mut target, *position);
					let value = reader.read(decoder, Some(slot))?;
					self.factory.set(&mut target, *position, value);
				}
				Some(FieldSlot::Skip(reader)) => reader.skip(decoder)?,
				None => {
					return Err(DecodeError::custom(format!(
						"resolving decoder reported an out-of-range writer field position {writer_position}"
					)))
				}
			}
		}
		Ok(target)
	}
}

impl<F: RecordFactory> StructReader<F> {
	/// Skips every physical field without materializing any of them
	///
	/// Unlike [`Self::read_into`] this only needs a plain [`Decoder`]: skipping
	/// doesn't care what order the writer wrote fields in.
	pub fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		for slot in &mut self.slots {
			match slot {
				FieldSlot::Read { reader, .. } | FieldSlot::Skip(reader) => reader.skip(decoder)?,
			}
		}
		Ok(())
	}
}

/// Walks a precomputed read plan: an ordered list of `(projection position,
/// reader)` pairs matching the physical writer field order, built once by
/// [`crate::plan`] and reused across every row
pub struct PlannedStructReader<F: RecordFactory> {
	plan: Vec<(Option<usize>, Box<dyn ValueReader>)>,
	expected_len: usize,
	factory: F,
	/// Advanced once per row read, only on the top-level row reader (nested
	/// struct readers built by [`crate::plan`] for struct-typed fields don't
	/// carry one, so a single row read only advances the shared cursor once).
	row_cursor: Option<super::positional::RowCursor>,
}

impl<F: RecordFactory> PlannedStructReader<F> {
	pub fn new(plan: Vec<(Option<usize>, Box<dyn ValueReader>)>, expected_len: usize, factory: F) -> Self {
		Self {
			plan,
			expected_len,
			factory,
			row_cursor: None,
		}
	}

	/// Like [`Self::new`], but advances `row_cursor` once per [`Self::read_into`]
	/// call - this is what makes `_pos`/`_row_id` actually track the current
	/// row without every caller remembering to advance it by hand. Pass the
	/// same [`RowCursor`](super::positional::RowCursor) that was given to
	/// [`crate::plan::build_plan`] for this plan.
	pub fn with_row_cursor(
		plan: Vec<(Option<usize>, Box<dyn ValueReader>)>,
		expected_len: usize,
		factory: F,
		row_cursor: super::positional::RowCursor,
	) -> Self {
		Self {
			plan,
			expected_len,
			factory,
			row_cursor: Some(row_cursor),
		}
	}

	/// The typed read path: materializes directly into `F::Target` without
	/// round-tripping through a [`Value::Record`]
	pub fn read_into(
		&mut self,
		decoder: &mut dyn Decoder,
		reuse: Option<F::Target>,
	) -> Result<F::Target, DecodeError> {
		let mut target = reuse.unwrap_or_else(|| self.factory.create(self.expected_len));
		for (position, reader) in &mut self.plan {
			match position {
				Some(position) => {
					let slot = self.factory.get(&mut target, *position);
					let value = reader.read(decoder, Some(slot))?;
					self.factory.set(&mut target, *position, value);
				}
				None => reader.skip(decoder)?,
			}
		}
		if let Some(row_cursor) = &self.row_cursor {
			row_cursor.advance();
		}
		Ok(target)
	}
}

impl<F: RecordFactory> ValueReader for PlannedStructReader<F> {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		let typed_reuse = match reuse {
			Some(Value::Record(record)) => {
				let mut target = self.factory.create(self.expected_len);
				for (i, value) in record.into_fields().into_iter().enumerate() {
					self.factory.set(&mut target, i, value);
				}
				Some(target)
			}
			_ => None,
		};
		let mut target = self.read_into(decoder, typed_reuse)?;
		let mut record = GenericRecord::new(self.expected_len);
		for position in 0..self.expected_len {
			let value = self.factory.get(&mut target, position);
			crate::value::GenericRecordFactory.set(&mut record, position, value);
		}
		Ok(Value::Record(record))
	}

	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		for (_, reader) in &mut self.plan {
			reader.skip(decoder)?;
		}
		Ok(())
	}
}
