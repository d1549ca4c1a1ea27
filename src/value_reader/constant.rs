//! Readers that short-circuit the writer's bytes in favor of a caller-
//! supplied constant value
//!
//! The read plan installs one of these whenever a constant was supplied for
//! a field id, regardless of whether that field also has a physical
//! counterpart in the writer schema: the constant always wins.

use super::ValueReader;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

/// The field has no physical counterpart in the writer schema: there is
/// nothing on the wire to skip, the constant is simply handed back every
/// time.
#[derive(Debug, Clone)]
pub struct ConstantReader {
	value: Value,
}

impl ConstantReader {
	pub fn new(value: Value) -> Self {
		Self { value }
	}
}

impl ValueReader for ConstantReader {
	fn read(&mut self, _decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		Ok(self.value.clone())
	}
	fn skip(&mut self, _decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		Ok(())
	}
}

/// The field does have a physical counterpart, but a constant was also
/// supplied for its field id: the bytes must still be consumed to keep the
/// stream aligned, but the materialized value is always the constant.
pub struct ReplaceWithConstantReader {
	value: Value,
	physical: Box<dyn ValueReader>,
}

impl ReplaceWithConstantReader {
	pub fn new(value: Value, physical: Box<dyn ValueReader>) -> Self {
		Self { value, physical }
	}
}

impl ValueReader for ReplaceWithConstantReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		// Skip, not read: reuse of the physical value is pointless, it's
		// discarded unconditionally.
		self.physical.skip(decoder)?;
		Ok(self.value.clone())
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		self.physical.skip(decoder)
	}
}
