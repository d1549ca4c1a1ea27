//! Hand-rolled Avro binary encoding helpers shared by the integration tests
//!
//! Tests build their input bytes by hand rather than pulling in an encoder
//! crate, so each helper here mirrors exactly one piece of the Avro spec
//! this crate's `BinaryDecoder` is expected to decode.

/// Zig-zag + varint encodes a signed integer, the way Avro `int`/`long` are
/// written on the wire
pub fn zigzag_varint(n: i64) -> Vec<u8> {
	let mut zigzag = ((n << 1) ^ (n >> 63)) as u64;
	let mut out = Vec::new();
	loop {
		let byte = (zigzag & 0x7f) as u8;
		zigzag >>= 7;
		if zigzag == 0 {
			out.push(byte);
			break;
		} else {
			out.push(byte | 0x80);
		}
	}
	out
}

/// Length-prefixed UTF-8 bytes, the way Avro `string` is written
pub fn string_bytes(s: &str) -> Vec<u8> {
	let mut out = zigzag_varint(s.len() as i64);
	out.extend_from_slice(s.as_bytes());
	out
}

/// Length-prefixed raw bytes, the way Avro `bytes` is written
pub fn bytes_bytes(b: &[u8]) -> Vec<u8> {
	let mut out = zigzag_varint(b.len() as i64);
	out.extend_from_slice(b);
	out
}

/// A single, non-blocked array/map body of `count` items (no trailing
/// byte-size hint) followed by the terminating zero
pub fn block(count: i64) -> Vec<u8> {
	zigzag_varint(count)
}

pub fn terminator() -> Vec<u8> {
	zigzag_varint(0)
}

pub fn concat(parts: impl IntoIterator<Item = Vec<u8>>) -> Vec<u8> {
	parts.into_iter().flatten().collect()
}
