mod common;

use common::*;
use iceberg_avro_values::decoder::BinaryDecoder;
use iceberg_avro_values::value::Value;
use iceberg_avro_values::value_reader::container::UnionReader;
use iceberg_avro_values::value_reader::positional::{
	LastUpdatedSeqReader, PositionReader, RowCursor, RowIdReader,
};
use iceberg_avro_values::value_reader::primitive::{LongReader, NullReader};
use iceberg_avro_values::value_reader::{SupportsRowPosition, ValueReader};

#[test]
fn position_reader_is_monotonic_with_shared_cursor() {
	let cursor = RowCursor::new(0);
	let mut reader = PositionReader::default();
	reader.set_row_position_supplier(cursor.supplier());

	let mut decoder = BinaryDecoder::from_slice(&[]);
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(0));
	cursor.advance();
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(1));
	cursor.advance();
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(2));
}

#[test]
fn row_id_reader_falls_back_to_base_plus_position() {
	let cursor = RowCursor::new(0);
	let mut reader = RowIdReader::new(1000);
	reader.set_row_position_supplier(cursor.supplier());

	let mut decoder = BinaryDecoder::from_slice(&[]);
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(1000));
	cursor.advance();
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(1001));
}

#[test]
fn last_updated_seq_reader_ignores_base_row_id_after_construction() {
	// base_row_id only gates construction; once built, every row gets the same
	// sequence number regardless of which row is being read.
	let mut reader = LastUpdatedSeqReader::new(42, 7);
	let mut decoder = BinaryDecoder::from_slice(&[]);
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(7));
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(7));
}

#[test]
fn row_id_reader_prefers_non_null_physical_value_over_fallback() {
	let cursor = RowCursor::new(0);
	let mut reader = RowIdReader::with_physical(1000, Box::new(LongReader));
	reader.set_row_position_supplier(cursor.supplier());

	let bytes = zigzag_varint(500);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(500));
}

#[test]
fn row_id_reader_falls_back_when_physical_value_is_null() {
	let cursor = RowCursor::new(0);
	let physical: Box<dyn ValueReader> = Box::new(UnionReader::new(vec![Box::new(NullReader), Box::new(LongReader)]));
	let mut reader = RowIdReader::with_physical(1000, physical);
	reader.set_row_position_supplier(cursor.supplier());

	// branch 0 ("null") of ["null", "long"]
	let bytes = zigzag_varint(0);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(1000));
}

#[test]
fn last_updated_seq_reader_prefers_non_null_physical_value_over_constant() {
	let mut reader = LastUpdatedSeqReader::with_physical(42, 7, Box::new(LongReader));
	let bytes = zigzag_varint(99);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(99));
}

#[test]
fn last_updated_seq_reader_falls_back_to_constant_when_physical_value_is_null() {
	let physical: Box<dyn ValueReader> = Box::new(UnionReader::new(vec![Box::new(NullReader), Box::new(LongReader)]));
	let mut reader = LastUpdatedSeqReader::with_physical(42, 7, physical);
	let bytes = zigzag_varint(0);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	assert_eq!(reader.read(&mut decoder, None).unwrap(), Value::Long(7));
}
