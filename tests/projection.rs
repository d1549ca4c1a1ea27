mod common;

use std::collections::HashMap;

use common::*;
use iceberg_avro_values::decoder::BinaryDecoder;
use iceberg_avro_values::error::PlanError;
use iceberg_avro_values::plan::{build_plan, PositionalContext};
use iceberg_avro_values::schema::{reserved, LogicalType, NestedField, StructType, WriterSchema};
use iceberg_avro_values::value::{GenericRecordFactory, Value};
use iceberg_avro_values::value_reader::positional::RowCursor;
use iceberg_avro_values::value_reader::struct_reader::PlannedStructReader;
use pretty_assertions::assert_eq;

fn writer_with_two_fields() -> anyhow::Result<WriterSchema> {
	Ok(r#"{
		"type": "record",
		"name": "row",
		"fields": [
			{"name": "id", "type": "long", "field-id": 1},
			{"name": "name", "type": "string", "field-id": 2}
		]
	}"#
	.parse()?)
}

#[test]
fn projects_every_matching_field_in_writer_order() {
	let writer = writer_with_two_fields().unwrap();
	let expected = StructType::new(vec![
		NestedField::required(1, "id", LogicalType::Long),
		NestedField::optional(2, "name", LogicalType::String),
	]);
	let cursor = RowCursor::new(0);
	let plan = build_plan(
		&expected,
		&writer,
		writer.root(),
		&HashMap::new(),
		&cursor,
		PositionalContext::default(),
	)
	.unwrap();
	assert_eq!(plan.len(), 2);
	assert!(plan.iter().all(|(pos, _)| pos.is_some()));

	let mut reader = PlannedStructReader::new(plan, expected.len(), GenericRecordFactory);
	let bytes = concat([zigzag_varint(2), string_bytes("bob")]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let record = reader.read_into(&mut decoder, None).unwrap();
	assert_eq!(record.fields()[0], Value::Long(1));
	assert_eq!(record.fields()[1], Value::String("bob".to_owned()));
}

#[test]
fn skips_writer_fields_not_in_expected_schema() {
	let writer: WriterSchema = r#"{
		"type": "record",
		"name": "row",
		"fields": [
			{"name": "id", "type": "long", "field-id": 1},
			{"name": "legacy", "type": "string", "field-id": 99}
		]
	}"#
	.parse()
	.unwrap();
	let expected = StructType::new(vec![NestedField::required(1, "id", LogicalType::Long)]);
	let cursor = RowCursor::new(0);
	let plan = build_plan(
		&expected,
		&writer,
		writer.root(),
		&HashMap::new(),
		&cursor,
		PositionalContext::default(),
	)
	.unwrap();
	// One read entry for `id`, one skip-only entry for `legacy`.
	assert_eq!(plan.len(), 2);
	assert_eq!(plan.iter().filter(|(pos, _)| pos.is_none()).count(), 1);

	let mut reader = PlannedStructReader::new(plan, expected.len(), GenericRecordFactory);
	let bytes = concat([zigzag_varint(5), string_bytes("ignored field bytes")]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let record = reader.read_into(&mut decoder, None).unwrap();
	assert_eq!(record.fields()[0], Value::Long(5));
}

#[test]
fn missing_required_field_with_no_default_is_an_error() {
	let writer: WriterSchema = r#"{
		"type": "record",
		"name": "row",
		"fields": [
			{"name": "id", "type": "long", "field-id": 1}
		]
	}"#
	.parse()
	.unwrap();
	let expected = StructType::new(vec![
		NestedField::required(1, "id", LogicalType::Long),
		NestedField::required(2, "required_but_absent", LogicalType::String),
	]);
	let cursor = RowCursor::new(0);
	let err = build_plan(
		&expected,
		&writer,
		writer.root(),
		&HashMap::new(),
		&cursor,
		PositionalContext::default(),
	)
	.unwrap_err();
	match err {
		PlanError::MissingRequiredField { field_id, .. } => assert_eq!(field_id, 2),
		other => panic!("expected MissingRequiredField, got {other:?}"),
	}
}

#[test]
fn missing_optional_field_materializes_as_null() {
	let writer: WriterSchema = r#"{
		"type": "record",
		"name": "row",
		"fields": [
			{"name": "id", "type": "long", "field-id": 1}
		]
	}"#
	.parse()
	.unwrap();
	let expected = StructType::new(vec![
		NestedField::required(1, "id", LogicalType::Long),
		NestedField::optional(2, "nickname", LogicalType::String),
	]);
	let cursor = RowCursor::new(0);
	let plan = build_plan(
		&expected,
		&writer,
		writer.root(),
		&HashMap::new(),
		&cursor,
		PositionalContext::default(),
	)
	.unwrap();
	let mut reader = PlannedStructReader::new(plan, expected.len(), GenericRecordFactory);
	let bytes = zigzag_varint(3);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let record = reader.read_into(&mut decoder, None).unwrap();
	assert_eq!(record.fields()[1], Value::Null);
}

#[test]
fn constant_wins_over_physical_value_but_still_consumes_its_bytes() {
	let writer = writer_with_two_fields().unwrap();
	let expected = StructType::new(vec![
		NestedField::required(1, "id", LogicalType::Long),
		NestedField::optional(2, "name", LogicalType::String),
	]);
	let mut constants = HashMap::new();
	constants.insert(2, Value::String("overridden".to_owned()));
	let cursor = RowCursor::new(0);
	let plan = build_plan(
		&expected,
		&writer,
		writer.root(),
		&constants,
		&cursor,
		PositionalContext::default(),
	)
	.unwrap();
	let mut reader = PlannedStructReader::new(plan, expected.len(), GenericRecordFactory);
	let bytes = concat([zigzag_varint(2), string_bytes("on the wire"), zigzag_varint(99)]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let record = reader.read_into(&mut decoder, None).unwrap();
	assert_eq!(record.fields()[1], Value::String("overridden".to_owned()));
	// The physical bytes for `name` were still consumed, so the stream is
	// correctly aligned for whatever comes after.
	assert_eq!(decoder.remaining(), 0);
}

#[test]
fn constant_for_field_with_no_physical_counterpart() {
	let writer: WriterSchema = r#"{
		"type": "record",
		"name": "row",
		"fields": [
			{"name": "id", "type": "long", "field-id": 1}
		]
	}"#
	.parse()
	.unwrap();
	let expected = StructType::new(vec![
		NestedField::required(1, "id", LogicalType::Long),
		NestedField::required(2, "partition_value", LogicalType::Int),
	]);
	let mut constants = HashMap::new();
	constants.insert(2, Value::Int(17));
	let cursor = RowCursor::new(0);
	let plan = build_plan(
		&expected,
		&writer,
		writer.root(),
		&constants,
		&cursor,
		PositionalContext::default(),
	)
	.unwrap();
	let mut reader = PlannedStructReader::new(plan, expected.len(), GenericRecordFactory);
	let bytes = zigzag_varint(1);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let record = reader.read_into(&mut decoder, None).unwrap();
	assert_eq!(record.fields()[1], Value::Int(17));
}

#[test]
fn projects_nested_struct_subset() {
	let writer: WriterSchema = r#"{
		"type": "record",
		"name": "row",
		"fields": [
			{"name": "point", "field-id": 1, "type": {
				"type": "record",
				"name": "point",
				"fields": [
					{"name": "x", "type": "int", "field-id": 10},
					{"name": "y", "type": "int", "field-id": 11}
				]
			}}
		]
	}"#
	.parse()
	.unwrap();
	let expected = StructType::new(vec![NestedField::required(
		1,
		"point",
		LogicalType::Struct(StructType::new(vec![NestedField::required(
			10,
			"x",
			LogicalType::Int,
		)])),
	)]);
	let cursor = RowCursor::new(0);
	let plan = build_plan(
		&expected,
		&writer,
		writer.root(),
		&HashMap::new(),
		&cursor,
		PositionalContext::default(),
	)
	.unwrap();
	let mut reader = PlannedStructReader::new(plan, expected.len(), GenericRecordFactory);
	let bytes = concat([zigzag_varint(5), zigzag_varint(6)]);
	let mut decoder = BinaryDecoder::from_slice(&bytes);
	let record = reader.read_into(&mut decoder, None).unwrap();
	match &record.fields()[0] {
		Value::Record(nested) => assert_eq!(nested.fields().to_vec(), vec![Value::Int(5)]),
		other => panic!("expected nested record, got {other:?}"),
	}
}

#[test]
fn synthesizes_row_position_metadata_column_across_rows() {
	let writer = writer_with_two_fields().unwrap();
	let expected = StructType::new(vec![
		NestedField::required(1, "id", LogicalType::Long),
		NestedField::required(reserved::ROW_POSITION, "_pos", LogicalType::Long),
	]);
	let cursor = RowCursor::new(0);
	let plan = build_plan(
		&expected,
		&writer,
		writer.root(),
		&HashMap::new(),
		&cursor,
		PositionalContext::default(),
	)
	.unwrap();
	let mut reader = PlannedStructReader::with_row_cursor(plan, expected.len(), GenericRecordFactory, cursor);

	let row_0 = concat([zigzag_varint(1), string_bytes("a")]);
	let mut decoder = BinaryDecoder::from_slice(&row_0);
	let record = reader.read_into(&mut decoder, None).unwrap();
	assert_eq!(record.fields()[1], Value::Long(0));

	let row_1 = concat([zigzag_varint(2), string_bytes("b")]);
	let mut decoder = BinaryDecoder::from_slice(&row_1);
	let record = reader.read_into(&mut decoder, None).unwrap();
	assert_eq!(record.fields()[1], Value::Long(1));
}
