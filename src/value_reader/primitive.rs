//! Readers for primitive types, plus the numeric promotions Avro schema
//! resolution allows (int -> long -> float -> double, string <-> bytes)

use super::ValueReader;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

macro_rules! simple_reader {
	($name:ident, $read:ident, $skip:ident, $variant:ident) => {
		#[derive(Debug, Clone, Copy, Default)]
		pub struct $name;

		impl ValueReader for $name {
			fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
				Ok(Value::$variant(decoder.$read()?))
			}
			fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
				decoder.$skip()
			}
		}
	};
}

simple_reader!(BooleanReader, read_boolean, skip_boolean, Boolean);
simple_reader!(IntReader, read_int, skip_int, Int);
simple_reader!(LongReader, read_long, skip_long, Long);
simple_reader!(FloatReader, read_float, skip_float, Float);
simple_reader!(DoubleReader, read_double, skip_double, Double);

#[derive(Debug, Clone, Copy, Default)]
pub struct NullReader;

impl ValueReader for NullReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		decoder.read_null()?;
		Ok(Value::Null)
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.read_null()
	}
}

/// Reuses a supplied `String` buffer instead of allocating, per the reuse
/// semantics for strings (arrays/maps/records/fixed only - but `String` reuse
/// is cheap and the `Decoder::read_string` contract already supports it, so
/// it's honored here)
#[derive(Debug, Clone, Copy, Default)]
pub struct StringReader;

impl ValueReader for StringReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		let reuse = match reuse {
			Some(Value::String(s)) => Some(s),
			_ => None,
		};
		Ok(Value::String(decoder.read_string(reuse)?))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_string()
	}
}

/// Never reuses its buffer: byte payloads of unknown provenance (often large,
/// often decimal-backed) are not safe to silently splice into a caller's
/// previous buffer without the caller explicitly asking for it
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesReader;

impl ValueReader for BytesReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		Ok(Value::Bytes(decoder.read_bytes(None)?))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_bytes()
	}
}

/// Reads a writer `bytes` value and materializes it as an expected `string`
/// field, per Avro schema-resolution promotion rules
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesAsStringReader;

impl ValueReader for BytesAsStringReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		let bytes = decoder.read_bytes(None)?;
		let s = String::from_utf8(bytes)
			.map_err(|e| DecodeError::custom(format!("bytes-as-string promotion: not utf-8: {e}")))?;
		Ok(Value::String(s))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_bytes()
	}
}

/// Reads a writer `string` value and materializes it as an expected `bytes`
/// field, per Avro schema-resolution promotion rules
#[derive(Debug, Clone, Copy, Default)]
pub struct StringAsBytesReader;

impl ValueReader for StringAsBytesReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		let s = decoder.read_string(None)?;
		Ok(Value::Bytes(s.into_bytes()))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_string()
	}
}

/// Fixed-size byte array; the buffer is reused across calls when `reuse` is
/// supplied and already the right length (reuse applies to fixed, per the
/// general reuse rule)
#[derive(Debug, Clone)]
pub struct FixedReader {
	size: usize,
}

impl FixedReader {
	pub fn new(size: usize) -> Self {
		Self { size }
	}
}

impl ValueReader for FixedReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		let mut buf = match reuse {
			Some(Value::Fixed(buf)) if buf.len() == self.size => buf,
			_ => vec![0u8; self.size],
		};
		decoder.read_fixed(&mut buf)?;
		Ok(Value::Fixed(buf))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_fixed(self.size)
	}
}

/// Reads a writer `enum` value, keeping both the ordinal and the writer's
/// symbol text (the expected schema's symbol set may differ; reconciling
/// them is a projection concern this crate leaves to the caller per field)
#[derive(Debug, Clone)]
pub struct EnumReader {
	symbols: Vec<String>,
}

impl EnumReader {
	pub fn new(symbols: Vec<String>) -> Self {
		Self { symbols }
	}
}

impl ValueReader for EnumReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		let idx = decoder.read_enum()?;
		let symbol = self
			.symbols
			.get(idx)
			.cloned()
			.ok_or_else(|| DecodeError::custom(format!("enum symbol index {idx} out of range")))?;
		Ok(Value::Enum(idx, symbol))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_enum()
	}
}

macro_rules! promotion_reader {
	($name:ident, $read:ident, $skip:ident, $variant:ident, $cast:ty) => {
		/// Schema-resolution numeric promotion
		#[derive(Debug, Clone, Copy, Default)]
		pub struct $name;

		impl ValueReader for $name {
			fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
				Ok(Value::$variant(decoder.$read()? as $cast))
			}
			fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
				decoder.$skip()
			}
		}
	};
}

promotion_reader!(IntAsLongReader, read_int, skip_int, Long, i64);
promotion_reader!(IntAsFloatReader, read_int, skip_int, Float, f32);
promotion_reader!(IntAsDoubleReader, read_int, skip_int, Double, f64);
promotion_reader!(LongAsFloatReader, read_long, skip_long, Float, f32);
promotion_reader!(LongAsDoubleReader, read_long, skip_long, Double, f64);
promotion_reader!(FloatAsDoubleReader, read_float, skip_float, Double, f64);
