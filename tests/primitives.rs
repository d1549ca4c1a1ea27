mod common;

use common::*;
use iceberg_avro_values::decoder::{BinaryDecoder, Decoder};
use iceberg_avro_values::value::Value;
use iceberg_avro_values::value_reader::logical::{
	DecimalEncoding, DecimalReader, MicrosKind, MicrosReader, UuidReader,
};
use iceberg_avro_values::value_reader::primitive::{
	BytesAsStringReader, BytesReader, FixedReader, IntAsDoubleReader, IntAsFloatReader,
	IntAsLongReader, IntReader, LongAsDoubleReader, LongReader, StringAsBytesReader, StringReader,
};
use iceberg_avro_values::value_reader::ValueReader;

#[test]
fn decodes_zigzag_varint_int_and_long() {
	let bytes = concat([zigzag_varint(-1), zigzag_varint(1_000_000)]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(decoder.read_int().unwrap(), -1);
	assert_eq!(decoder.read_long().unwrap(), 1_000_000);
}

#[test]
fn decodes_float_and_double_little_endian() {
	let mut bytes = 1.5f32.to_le_bytes().to_vec();
	bytes.extend_from_slice(&2.25f64.to_le_bytes());
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(decoder.read_float().unwrap(), 1.5);
	assert_eq!(decoder.read_double().unwrap(), 2.25);
}

#[test]
fn decodes_boolean() {
	let bytes = [0u8, 1u8];
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(decoder.read_boolean().unwrap(), false);
	assert_eq!(decoder.read_boolean().unwrap(), true);
}

#[test]
fn rejects_invalid_boolean_byte() {
	let bytes = [7u8];
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert!(decoder.read_boolean().is_err());
}

#[test]
fn string_reader_reuses_supplied_buffer() {
	let bytes = string_bytes("hello");
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let mut reader = StringReader;
	let reuse = Some(Value::String(String::from("some previous allocation")));
	let value = reader.read(&mut decoder, reuse).unwrap();
	assert_eq!(value, Value::String("hello".to_owned()));
}

#[test]
fn bytes_reader_never_reuses() {
	let bytes = bytes_bytes(&[1, 2, 3]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let mut reader = BytesReader;
	// Even when a reuse candidate is supplied, BytesReader must not hand the
	// allocation back to the decoder for mutation.
	let value = reader
		.read(&mut decoder, Some(Value::Bytes(vec![9, 9, 9, 9, 9])))
		.unwrap();
	assert_eq!(value, Value::Bytes(vec![1, 2, 3]));
}

#[test]
fn fixed_reader_reuses_same_size_buffer() {
	let bytes = [0xde, 0xad, 0xbe, 0xef];
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let mut reader = FixedReader::new(4);
	let value = reader
		.read(&mut decoder, Some(Value::Fixed(vec![0, 0, 0, 0])))
		.unwrap();
	assert_eq!(value, Value::Fixed(vec![0xde, 0xad, 0xbe, 0xef]));
}

#[test]
fn promotion_int_to_long_float_double() {
	let bytes = concat([zigzag_varint(42), zigzag_varint(42), zigzag_varint(42)]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(
		IntAsLongReader.read(&mut decoder, None).unwrap(),
		Value::Long(42)
	);
	assert_eq!(
		IntAsFloatReader.read(&mut decoder, None).unwrap(),
		Value::Float(42.0)
	);
	assert_eq!(
		IntAsDoubleReader.read(&mut decoder, None).unwrap(),
		Value::Double(42.0)
	);
}

#[test]
fn promotion_long_to_double() {
	let bytes = zigzag_varint(9_000_000_000);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(
		LongAsDoubleReader.read(&mut decoder, None).unwrap(),
		Value::Double(9_000_000_000.0)
	);
}

#[test]
fn promotion_string_and_bytes_are_interchangeable() {
	let bytes = bytes_bytes(b"abc");
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(
		BytesAsStringReader.read(&mut decoder, None).unwrap(),
		Value::String("abc".to_owned())
	);

	let bytes = string_bytes("xyz");
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(
		StringAsBytesReader.read(&mut decoder, None).unwrap(),
		Value::Bytes(b"xyz".to_vec())
	);
}

#[test]
fn reads_uuid_as_big_endian_fixed_16() {
	let mut bytes = vec![0u8; 16];
	bytes[15] = 1;
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(UuidReader.read(&mut decoder, None).unwrap(), Value::Uuid(1));
}

#[test]
fn reads_decimal_from_fixed_two_complement_bytes() {
	// unscaled = 12345, scale = 2 -> 123.45
	let unscaled: i32 = 12345;
	let be = unscaled.to_be_bytes();
	let mut decoder = BinaryDecoder::from_slice(&be);
	let mut reader = DecimalReader::new(DecimalEncoding::Fixed(4), 2);
	let value = reader.read(&mut decoder, None).unwrap();
	assert_eq!(
		value,
		Value::Decimal(rust_decimal::Decimal::new(12345, 2))
	);
}

#[test]
fn reads_decimal_from_bytes_encoding_negative_value() {
	let unscaled: i64 = -42;
	// Minimal two's-complement big-endian representation (1 byte is enough for -42)
	let be = [(unscaled as i8) as u8];
	let bytes = bytes_bytes(&be);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let mut reader = DecimalReader::new(DecimalEncoding::Bytes, 0);
	let value = reader.read(&mut decoder, None).unwrap();
	assert_eq!(value, Value::Decimal(rust_decimal::Decimal::new(-42, 0)));
}

#[test]
fn reads_time_and_timestamp_micros() {
	let bytes = zigzag_varint(123_456_789);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let mut reader = MicrosReader::new(MicrosKind::Timestamp);
	assert_eq!(
		reader.read(&mut decoder, None).unwrap(),
		Value::TimestampMicros(123_456_789)
	);
}

#[test]
fn skip_matches_read_alignment_for_mixed_primitives() {
	let bytes = concat([
		zigzag_varint(7),
		string_bytes("skip me"),
		zigzag_varint(8),
	]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	IntReader.skip(&mut decoder).unwrap();
	StringReader.skip(&mut decoder).unwrap();
	assert_eq!(LongReader.read(&mut decoder, None).unwrap(), Value::Long(8));
}
