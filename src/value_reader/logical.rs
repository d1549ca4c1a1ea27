//! Readers for logical types layered on top of Avro primitives: `uuid`,
//! `decimal`, `date`, `time-micros`, `timestamp-micros`, `variant`

use super::ValueReader;
use crate::decoder::Decoder;
use crate::error::DecodeError;
use crate::value::Value;

/// `uuid`, encoded on the wire as 16 fixed bytes, big-endian
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidReader;

impl ValueReader for UuidReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		let mut buf = [0u8; 16];
		decoder.read_fixed(&mut buf)?;
		Ok(Value::Uuid(u128::from_be_bytes(buf)))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_fixed(16)
	}
}

/// How a `decimal` logical type is physically encoded: a fixed-size byte
/// array, or a length-prefixed `bytes` value. Never reuses a buffer: the
/// unscaled integer is parsed out immediately, there's no stable byte layout
/// worth keeping around for the next row.
#[derive(Debug, Clone, Copy)]
pub enum DecimalEncoding {
	Fixed(usize),
	Bytes,
}

#[derive(Debug, Clone)]
pub struct DecimalReader {
	encoding: DecimalEncoding,
	scale: u32,
}

impl DecimalReader {
	pub fn new(encoding: DecimalEncoding, scale: u32) -> Self {
		Self { encoding, scale }
	}

	fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
		if bytes.is_empty() || bytes.len() > 16 {
			return Err(DecodeError::invalid_decimal_encoding(format!(
				"{}-byte unscaled value",
				bytes.len()
			)));
		}
		// Sign-extend the big-endian two's-complement payload into an i128.
		let negative = bytes[0] & 0x80 != 0;
		let mut buf = [if negative { 0xffu8 } else { 0 }; 16];
		buf[16 - bytes.len()..].copy_from_slice(bytes);
		let unscaled = i128::from_be_bytes(buf);
		let decimal = rust_decimal::Decimal::try_from_i128_with_scale(unscaled, self.scale)
			.map_err(|e| DecodeError::invalid_decimal_encoding(e))?;
		Ok(Value::Decimal(decimal))
	}
}

impl ValueReader for DecimalReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		match self.encoding {
			DecimalEncoding::Fixed(size) => {
				let mut buf = vec![0u8; size];
				decoder.read_fixed(&mut buf)?;
				self.decode(&buf)
			}
			DecimalEncoding::Bytes => {
				let buf = decoder.read_bytes(None)?;
				self.decode(&buf)
			}
		}
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		match self.encoding {
			DecimalEncoding::Fixed(size) => decoder.skip_fixed(size),
			DecimalEncoding::Bytes => decoder.skip_bytes(),
		}
	}
}

/// `date`, encoded on the wire as an `int`: days since the epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct DateReader;

impl ValueReader for DateReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		Ok(Value::Date(decoder.read_int()?))
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_int()
	}
}

/// `time-micros` / `timestamp-micros`, both encoded on the wire as a `long`
#[derive(Debug, Clone, Copy)]
pub enum MicrosKind {
	Time,
	Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct MicrosReader {
	kind: MicrosKind,
}

impl MicrosReader {
	pub fn new(kind: MicrosKind) -> Self {
		Self { kind }
	}
}

impl ValueReader for MicrosReader {
	fn read(&mut self, decoder: &mut dyn Decoder, _reuse: Option<Value>) -> Result<Value, DecodeError> {
		let micros = decoder.read_long()?;
		Ok(match self.kind {
			MicrosKind::Time => Value::TimeMicros(micros),
			MicrosKind::Timestamp => Value::TimestampMicros(micros),
		})
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_long()
	}
}

/// `variant`: a pair of length-delimited byte buffers, `metadata` then
/// `value`. Per the Iceberg variant spec both fields are read as plain Avro
/// `bytes`, but the multi-byte integers packed *inside* those buffers
/// (header sizes, offsets) are little-endian, unlike the rest of this
/// crate's big-endian conventions (`uuid`, `decimal`) - this reader only
/// extracts the raw buffers, it does not interpret their contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantReader;

impl ValueReader for VariantReader {
	fn read(&mut self, decoder: &mut dyn Decoder, reuse: Option<Value>) -> Result<Value, DecodeError> {
		let (old_metadata, old_value) = match reuse {
			Some(Value::Variant { metadata, value }) => (Some(metadata), Some(value)),
			_ => (None, None),
		};
		let metadata = decoder.read_bytes(old_metadata)?;
		let value = decoder.read_bytes(old_value)?;
		Ok(Value::Variant { metadata, value })
	}
	fn skip(&mut self, decoder: &mut dyn Decoder) -> Result<(), DecodeError> {
		decoder.skip_bytes()?;
		decoder.skip_bytes()
	}
}
