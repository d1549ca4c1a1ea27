use super::{Decoder, DecodeError};

use crate::io::{Read as _, ReadSlice, ReaderRead, SliceRead};

/// A [`Decoder`] that reads raw Avro binary encoding
///
/// Generic over the `Read`/`ReadSlice` split in [`crate::io`]: it
/// can be instantiated either directly over a borrowed slice
/// ([`BinaryDecoder::from_slice`], zero intermediate copies) or over any
/// `impl std::io::Read` ([`BinaryDecoder::from_reader`], which copies through
/// an internal scratch buffer).
pub struct BinaryDecoder<R> {
	reader: R,
}

impl<'de> BinaryDecoder<SliceRead<'de>> {
	pub fn from_slice(slice: &'de [u8]) -> Self {
		Self {
			reader: SliceRead::new(slice),
		}
	}

	/// Number of bytes not yet consumed
	pub fn remaining(&self) -> usize {
		self.reader.remaining()
	}
}

impl<R: std::io::Read> BinaryDecoder<ReaderRead<R>> {
	pub fn from_reader(reader: R) -> Self {
		Self {
			reader: ReaderRead::new(reader),
		}
	}
}

impl<R> BinaryDecoder<R> {
	pub fn new(reader: R) -> Self {
		Self { reader }
	}
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl<'de, R: ReadSlice<'de>> BinaryDecoder<R> {
	fn read_len(&mut self) -> Result<usize, DecodeError> {
		let len: i64 = self.reader.read_varint()?;
		len.try_into()
			.map_err(|_| DecodeError::custom(format!("invalid length in stream: {len}")))
	}

	/// Skips `n` raw bytes without materializing them
	fn skip_raw(&mut self, n: usize) -> Result<(), DecodeError> {
		self.reader.read_slice(n, |_: &[u8]| Ok(()))
	}

	/// Reads one Avro array/map block-length prefix, handling the
	/// negative-count-with-byte-size-hint variant transparently, and
	/// returning the (always non-negative) element count for that block. `0`
	/// means the container is fully read.
	fn read_block_count(&mut self) -> Result<i64, DecodeError> {
		let count: i64 = self.reader.read_varint()?;
		if count < 0 {
			// Negative count: magnitude is the number of elements, followed by a
			// byte-size hint for the block that we don't need for decoding.
			let _byte_size: i64 = self.reader.read_varint()?;
			Ok(count.checked_neg().ok_or_else(|| {
				DecodeError::custom("array/map block count overflow on negation")
			})?)
		} else {
			Ok(count)
		}
	}
}

impl<'de, R: ReadSlice<'de>> Decoder for BinaryDecoder<R> {
	fn read_null(&mut self) -> Result<(), DecodeError> {
		Ok(())
	}

	fn read_boolean(&mut self) -> Result<bool, DecodeError> {
		match self.reader.read_const_size_buf::<1>()?[0] {
			0 => Ok(false),
			1 => Ok(true),
			other => Err(DecodeError::custom(format!(
				"invalid byte value when decoding boolean: {other}"
			))),
		}
	}

	fn read_int(&mut self) -> Result<i32, DecodeError> {
		self.reader.read_varint()
	}

	fn read_long(&mut self) -> Result<i64, DecodeError> {
		self.reader.read_varint()
	}

	fn read_float(&mut self) -> Result<f32, DecodeError> {
		Ok(f32::from_le_bytes(self.reader.read_const_size_buf::<4>()?))
	}

	fn read_double(&mut self) -> Result<f64, DecodeError> {
		Ok(f64::from_le_bytes(self.reader.read_const_size_buf::<8>()?))
	}

	fn read_string(&mut self, reuse: Option<String>) -> Result<String, DecodeError> {
		let len = self.read_len()?;
		let mut reuse = reuse;
		self.reader.read_slice(len, move |bytes: &[u8]| {
			let s = std::str::from_utf8(bytes)
				.map_err(|e| DecodeError::custom(format!("string is not valid utf-8: {e}")))?;
			Ok(match reuse.take() {
				Some(mut buf) => {
					buf.clear();
					buf.push_str(s);
					buf
				}
				None => s.to_owned(),
			})
		})
	}

	fn read_bytes(&mut self, reuse: Option<Vec<u8>>) -> Result<Vec<u8>, DecodeError> {
		let len = self.read_len()?;
		let mut reuse = reuse;
		self.reader.read_slice(len, move |bytes: &[u8]| {
			Ok(match reuse.take() {
				Some(mut buf) => {
					buf.clear();
					buf.extend_from_slice(bytes);
					buf
				}
				None => bytes.to_vec(),
			})
		})
	}

	fn read_fixed(&mut self, dst: &mut [u8]) -> Result<(), DecodeError> {
		let len = dst.len();
		self.reader.read_slice(len, move |bytes: &[u8]| {
			dst.copy_from_slice(bytes);
			Ok(())
		})
	}

	fn read_enum(&mut self) -> Result<usize, DecodeError> {
		let idx: i32 = self.reader.read_varint()?;
		idx.try_into()
			.map_err(|_| DecodeError::custom(format!("invalid enum symbol index: {idx}")))
	}

	fn read_index(&mut self) -> Result<usize, DecodeError> {
		let idx: i32 = self.reader.read_varint()?;
		idx.try_into()
			.map_err(|_| DecodeError::custom(format!("invalid union branch index: {idx}")))
	}

	fn read_array_start(&mut self) -> Result<i64, DecodeError> {
		self.read_block_count()
	}
	fn array_next(&mut self) -> Result<i64, DecodeError> {
		self.read_block_count()
	}
	fn read_map_start(&mut self) -> Result<i64, DecodeError> {
		self.read_block_count()
	}
	fn map_next(&mut self) -> Result<i64, DecodeError> {
		self.read_block_count()
	}

	fn skip_string(&mut self) -> Result<(), DecodeError> {
		let len = self.read_len()?;
		self.skip_raw(len)
	}

	fn skip_bytes(&mut self) -> Result<(), DecodeError> {
		let len = self.read_len()?;
		self.skip_raw(len)
	}

	fn skip_fixed(&mut self, len: usize) -> Result<(), DecodeError> {
		self.skip_raw(len)
	}

	fn skip_array(&mut self) -> Result<i64, DecodeError> {
		loop {
			let count: i64 = self.reader.read_varint()?;
			if count == 0 {
				return Ok(0);
			} else if count < 0 {
				let byte_size: i64 = self.reader.read_varint()?;
				self.skip_raw(byte_size.try_into().map_err(|_| {
					DecodeError::custom("negative byte-size hint in array block")
				})?)?;
			} else {
				return Ok(count);
			}
		}
	}

	fn skip_map(&mut self) -> Result<i64, DecodeError> {
		// Identical block framing to arrays
		self.skip_array()
	}
}
