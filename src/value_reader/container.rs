//! Readers for the container shapes: `array`, `map`, and `union`

use std::collections::HashMap;

use super::ValueReader;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

/// Reads an `array`, reusing the previous call's `Vec` (and recursively, its
/// elements) when supplied
pub struct ArrayReader {
	element: Box<dyn ValueReader>,
}

impl ArrayReader {
	pub fn new(element: Box<dyn ValueReader>) -> Self {
		Self { element }
	}
}

impl ValueReader for ArrayReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		let mut out = match reuse {
			Some(Value::Array(v)) => v,
			_ => Vec::new(),
		};
		let mut i = 0;
		let mut remaining = decoder.read_array_start()?;
		while remaining != 0 {
			for _ in 0..remaining {
				let slot = if i < out.len() {
					Some(std::mem::replace(&mut out[i], Value::Null))
				} else {
					None
				};
				let value = self.element.read(decoder, slot)?;
				if i < out.len() {
					out[i] = value;
				} else {
					out.push(value);
				}
				i += 1;
			}
			remaining = decoder.array_next()?;
		}
		out.truncate(i);
		Ok(Value::Array(out))
	}

	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		let mut remaining = decoder.skip_array()?;
		while remaining != 0 {
			for _ in 0..remaining {
				self.element.skip(decoder)?;
			}
			remaining = decoder.skip_array()?;
		}
		Ok(())
	}
}

/// Reads a `map`, reusing the previous call's `HashMap` when supplied
///
/// Map keys are always Avro `string`; reused entries are keyed by string
/// equality, so reuse only benefits values, not the map's own allocation
/// churn on key changes.
pub struct MapReader {
	value: Box<dyn ValueReader>,
}

impl MapReader {
	pub fn new(value: Box<dyn ValueReader>) -> Self {
		Self { value }
	}
}

impl ValueReader for MapReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		let mut previous = match reuse {
			Some(Value::Map(m)) => m,
			_ => HashMap::new(),
		};
		let mut out = HashMap::with_capacity(previous.len());
		let mut remaining = decoder.read_map_start()?;
		while remaining != 0 {
			for _ in 0..remaining {
				let key = decoder.read_string(None)?;
				let slot = previous.remove(&key);
				let value = self.value.read(decoder, slot)?;
				out.insert(key, value);
			}
			remaining = decoder.map_next()?;
		}
		Ok(Value::Map(out))
	}

	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		let mut remaining = decoder.skip_map()?;
		while remaining != 0 {
			for _ in 0..remaining {
				decoder.skip_string()?;
				self.value.skip(decoder)?;
			}
			remaining = decoder.skip_map()?;
		}
		Ok(())
	}
}

/// Reads a `union`: resolves the branch index the writer chose and delegates
/// to that branch's reader, surfacing the branch's value directly (the
/// branch index itself is not part of the materialized value - a caller who
/// only cares whether a field is null never needs to know it was encoded as
/// `["null", "long"]` rather than just `"long"`)
pub struct UnionReader {
	branches: Vec<Box<dyn ValueReader>>,
}

impl UnionReader {
	pub fn new(branches: Vec<Box<dyn ValueReader>>) -> Self {
		Self { branches }
	}
}

impl ValueReader for UnionReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		let idx = decoder.read_index()?;
		let branch = self
			.branches
			.get_mut(idx)
			.ok_or_else(|| DecodeError::custom(format!("union branch index {idx} out of range")))?;
		branch.read(decoder, reuse)
	}

	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		let idx = decoder.read_index()?;
		let branch = self
			.branches
			.get_mut(idx)
			.ok_or_else(|| DecodeError::custom(format!("union branch index {idx} out of range")))?;
		branch.skip(decoder)
	}
}
