//! A struct reader that only ever skips: installed by the plan builder for
//! a nested record that has no field, anywhere in the expected schema,
//! projecting into it

use super::ValueReader;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

/// Skips every physical field of a record, in writer order, without
/// materializing any of them
pub struct SkipStructReader {
	fields: Vec<Box<dyn ValueReader>>,
}

impl SkipStructReader {
	pub fn new(fields: Vec<Box<dyn ValueReader>>) -> Self {
		Self { fields }
	}
}

impl ValueReader for SkipStructReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		self.skip(decoder)?;
		Ok(Value::Null)
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		for field in &mut self.fields {
			field.skip(decoder)?;
		}
		Ok(())
	}
}
