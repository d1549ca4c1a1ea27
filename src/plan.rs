//! Builds a read plan: reconciles an expected [`StructType`] against a
//! writer [`WriterSchema`] and a constant map, producing the ordered list of
//! `(projection position, reader)` pairs a [`PlannedStructReader`] walks once
//! per row
//!
//! This is the heart of schema resolution. The algorithm, for each physical
//! writer field (in writer order):
//!
//! 1. if the writer field's `field-id` has a constant supplied for it, the
//!    physical bytes are still skipped (to keep the stream aligned) but the
//!    materialized value is always the constant
//!    ([`crate::value_reader::constant::ReplaceWithConstantReader`]);
//! 2. otherwise, if the `field-id` matches an expected field, a reader is
//!    built by resolving the writer type against the expected type (handling
//!    numeric promotions and recursing into nested structs/arrays/maps);
//! 3. otherwise the physical field isn't needed at all, and gets a reader
//!    built only to skip it correctly.
//!
//! Once every physical field is accounted for, whatever expected fields
//! still have no physical counterpart are appended at the end of the plan as
//! reader-only (non-decoder-consuming) entries, in this order of preference:
//! supplied constant, reserved positional metadata column, `initial_default`,
//! or (for an optional field with none of the above) a constant `null`. A
//! required field with none of the above is a [`PlanError::MissingRequiredField`].

use std::collections::HashMap;

use crate::error::PlanError;
use crate::schema::{reserved, LogicalType, NestedField, SchemaNode, StructType, WriterSchema};
use crate::value::Value;
use crate::value_reader::constant::{ConstantReader, ReplaceWithConstantReader};
use crate::value_reader::container::{ArrayReader, MapReader, UnionReader};
use crate::value_reader::logical::{DecimalEncoding, DecimalReader, MicrosKind, MicrosReader, UuidReader, DateReader};
use crate::value_reader::positional::{LastUpdatedSeqReader, PositionReader, RowCursor, RowIdReader};
use crate::value_reader::primitive::*;
use crate::value_reader::skip_struct::SkipStructReader;
use crate::value_reader::struct_reader::PlannedStructReader;
use crate::value_reader::{SupportsRowPosition, ValueReader};

/// One row/plan's worth of context for synthesizing positional metadata
/// columns - these come from outside the schema entirely (the manifest entry
/// for the file being read), not from the writer or expected schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalContext {
	pub base_row_id: Option<i64>,
	pub last_updated_sequence_number: Option<i64>,
}

/// A plan entry: `None` means "skip, no projection"; `Some(position)` means
/// "materialize and store at this position of the expected struct"
pub type PlanEntry = (Option<usize>, Box<dyn ValueReader>);

/// Builds the top-level plan for `expected` against `writer`, sharing
/// `row_cursor` with every positional reader the plan ends up needing
pub fn build_plan(
	expected: &StructType,
	writer: &WriterSchema,
	writer_key: crate::schema::SchemaKey,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Vec<PlanEntry>, PlanError> {
	let record = match writer.node(writer_key) {
		SchemaNode::Record(record) => record,
		other => {
			return Err(PlanError::InvalidWriterSchema(format!(
				"expected a record at the root of struct resolution, found {}",
				node_kind(other)
			)))
		}
	};
	build_struct_plan(expected, writer, record, constants, row_cursor, positional)
}

fn build_struct_plan(
	expected: &StructType,
	writer: &WriterSchema,
	record: &crate::schema::Record,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Vec<PlanEntry>, PlanError> {
	let mut plan = Vec::with_capacity(record.fields.len());
	let mut satisfied = vec![false; expected.len()];

	for field in &record.fields {
		let expected_position = field.field_id.and_then(|id| expected.position_of(id));
		match (expected_position, field.field_id.and_then(|id| constants.get(&id))) {
			(Some(position), Some(constant)) => {
				satisfied[position] = true;
				let physical = build_reader_for_writer_node(writer, field.schema, constants, row_cursor, positional)?;
				plan.push((
					Some(position),
					Box::new(ReplaceWithConstantReader::new(constant.clone(), physical)) as Box<dyn ValueReader>,
				));
			}
			(Some(position), None) => {
				satisfied[position] = true;
				let expected_field = &expected.fields()[position];
				let reader = match field.field_id {
					Some(reserved::ROW_ID) => build_row_id_reader(writer, field.schema, constants, row_cursor, positional)?,
					Some(reserved::LAST_UPDATED_SEQUENCE_NUMBER) => {
						build_last_updated_seq_reader(writer, field.schema, constants, row_cursor, positional)?
					}
					_ => build_reader(writer, field.schema, &expected_field.field_type, constants, row_cursor, positional)?,
				};
				plan.push((Some(position), reader));
			}
			(None, _) => {
				// Not projected: still has to be read off the wire to stay aligned.
				let reader = build_reader_for_writer_node(writer, field.schema, constants, row_cursor, positional)?;
				plan.push((None, reader));
			}
		}
	}

	for (position, expected_field) in expected.fields().iter().enumerate() {
		if satisfied[position] {
			continue;
		}
		let reader = build_unmatched_field_reader(expected_field, constants, row_cursor, positional)?;
		plan.push((Some(position), reader));
	}

	Ok(plan)
}

/// Builds the reader for an expected field that has no physical counterpart
/// anywhere in the writer record
fn build_unmatched_field_reader(
	field: &NestedField,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Box<dyn ValueReader>, PlanError> {
	if let Some(constant) = constants.get(&field.field_id) {
		return Ok(Box::new(ConstantReader::new(constant.clone())));
	}

	if let Some(reader) = build_reserved_reader(field.field_id, row_cursor, positional) {
		return Ok(reader);
	}

	if let Some(default) = &field.initial_default {
		return Ok(Box::new(ConstantReader::new(default.clone())));
	}

	if field.optional {
		return Ok(Box::new(ConstantReader::new(Value::Null)));
	}

	Err(PlanError::MissingRequiredField {
		name: field.name.clone(),
		field_id: field.field_id,
	})
}

fn build_reserved_reader(
	field_id: i32,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Option<Box<dyn ValueReader>> {
	match field_id {
		reserved::ROW_POSITION => {
			let mut reader = PositionReader::default();
			reader.set_row_position_supplier(row_cursor.supplier());
			Some(Box::new(reader))
		}
		reserved::ROW_ID => {
			let base_row_id = positional.base_row_id?;
			let mut reader = RowIdReader::new(base_row_id);
			reader.set_row_position_supplier(row_cursor.supplier());
			Some(Box::new(reader))
		}
		reserved::LAST_UPDATED_SEQUENCE_NUMBER => {
			let base_row_id = positional.base_row_id?;
			let sequence_number = positional.last_updated_sequence_number?;
			Some(Box::new(LastUpdatedSeqReader::new(base_row_id, sequence_number)))
		}
		// Merge-on-read rows are never marked deleted by the writer unless a
		// physical column says otherwise; unmatched, it's always `false`.
		reserved::IS_DELETED => Some(Box::new(ConstantReader::new(Value::Boolean(false)))),
		_ => None,
	}
}

/// Builds the reader for a physical `_row_id` column: it wins over the
/// `base_row_id + position` fallback whenever its value isn't `null`. With no
/// base row id to fall back to, the physical value is used as-is.
fn build_row_id_reader(
	writer: &WriterSchema,
	key: crate::schema::SchemaKey,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Box<dyn ValueReader>, PlanError> {
	let physical = build_reader(writer, key, &LogicalType::Long, constants, row_cursor, positional)?;
	Ok(match positional.base_row_id {
		Some(base_row_id) => Box::new(RowIdReader::with_physical(base_row_id, physical)),
		None => physical,
	})
}

/// Builds the reader for a physical `_last_updated_sequence_number` column:
/// see [`build_row_id_reader`] for the fallback-composition shape.
fn build_last_updated_seq_reader(
	writer: &WriterSchema,
	key: crate::schema::SchemaKey,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Box<dyn ValueReader>, PlanError> {
	let physical = build_reader(writer, key, &LogicalType::Long, constants, row_cursor, positional)?;
	Ok(match (positional.base_row_id, positional.last_updated_sequence_number) {
		(Some(base_row_id), Some(sequence_number)) => {
			Box::new(LastUpdatedSeqReader::with_physical(base_row_id, sequence_number, physical))
		}
		_ => physical,
	})
}

/// Builds a reader for a physical writer node whose value isn't projected
/// anywhere: it only ever needs to be skipped, but constructing a full
/// reader (rather than a bespoke skip-only walk) keeps the skip logic for
/// every type in exactly one place.
fn build_reader_for_writer_node(
	writer: &WriterSchema,
	key: crate::schema::SchemaKey,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Box<dyn ValueReader>, PlanError> {
	let expected = writer_node_to_logical_type(writer, key)?;
	build_reader(writer, key, &expected, constants, row_cursor, positional)
}

/// A best-effort [`LogicalType`] matching a writer node exactly, used only to
/// drive `build_reader` down the identity-resolution path for fields that
/// aren't projected
fn writer_node_to_logical_type(writer: &WriterSchema, key: crate::schema::SchemaKey) -> Result<LogicalType, PlanError> {
	Ok(match writer.node(key) {
		SchemaNode::Null => LogicalType::Boolean, // unreachable in practice; see build_reader's Null arm
		SchemaNode::Boolean => LogicalType::Boolean,
		SchemaNode::Int => LogicalType::Int,
		SchemaNode::Long => LogicalType::Long,
		SchemaNode::Float => LogicalType::Float,
		SchemaNode::Double => LogicalType::Double,
		SchemaNode::Bytes => LogicalType::Bytes,
		SchemaNode::String => LogicalType::String,
		SchemaNode::Fixed(f) => LogicalType::Fixed(f.size),
		SchemaNode::Uuid => LogicalType::Uuid,
		SchemaNode::Decimal(d) => LogicalType::Decimal {
			precision: d.precision,
			scale: d.scale,
		},
		SchemaNode::Date => LogicalType::Date,
		SchemaNode::TimeMillis | SchemaNode::TimeMicros => LogicalType::TimeMicros,
		SchemaNode::TimestampMillis | SchemaNode::TimestampMicros => LogicalType::TimestampMicros,
		SchemaNode::Array(elem) => LogicalType::List(Box::new(writer_node_to_logical_type(writer, *elem)?)),
		SchemaNode::Map(values) => LogicalType::Map(
			Box::new(LogicalType::String),
			Box::new(writer_node_to_logical_type(writer, *values)?),
		),
		SchemaNode::Union(u) => {
			// Resolve against whichever non-null branch exists first; skip-only
			// readers don't care which.
			let non_null = u
				.variants
				.iter()
				.find(|v| !matches!(writer.node(**v), SchemaNode::Null))
				.copied()
				.unwrap_or(u.variants[0]);
			writer_node_to_logical_type(writer, non_null)?
		}
		SchemaNode::Record(_) | SchemaNode::Enum(_) => LogicalType::Bytes, // placeholder, never inspected for skip-only records/enums
	})
}

fn node_kind(node: &SchemaNode) -> &'static str {
	match node {
		SchemaNode::Null => "null",
		SchemaNode::Boolean => "boolean",
		SchemaNode::Int => "int",
		SchemaNode::Long => "long",
		SchemaNode::Float => "float",
		SchemaNode::Double => "double",
		SchemaNode::Bytes => "bytes",
		SchemaNode::String => "string",
		SchemaNode::Array(_) => "array",
		SchemaNode::Map(_) => "map",
		SchemaNode::Union(_) => "union",
		SchemaNode::Record(_) => "record",
		SchemaNode::Enum(_) => "enum",
		SchemaNode::Fixed(_) => "fixed",
		SchemaNode::Decimal(_) => "decimal",
		SchemaNode::Uuid => "uuid",
		SchemaNode::Date => "date",
		SchemaNode::TimeMillis => "time-millis",
		SchemaNode::TimeMicros => "time-micros",
		SchemaNode::TimestampMillis => "timestamp-millis",
		SchemaNode::TimestampMicros => "timestamp-micros",
	}
}

/// Resolves a single writer node against a single expected type, recursing
/// into containers and nested structs as needed
fn build_reader(
	writer: &WriterSchema,
	key: crate::schema::SchemaKey,
	expected: &LogicalType,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Box<dyn ValueReader>, PlanError> {
	let node = writer.node(key);

	if let SchemaNode::Union(union) = node {
		return build_union_reader(writer, union, expected, constants, row_cursor, positional);
	}

	Ok(match (node, expected) {
		(SchemaNode::Null, _) => Box::new(NullReader),
		(SchemaNode::Boolean, LogicalType::Boolean) => Box::new(BooleanReader),
		(SchemaNode::Int, LogicalType::Int) => Box::new(IntReader),
		(SchemaNode::Int, LogicalType::Long) => Box::new(IntAsLongReader),
		(SchemaNode::Int, LogicalType::Float) => Box::new(IntAsFloatReader),
		(SchemaNode::Int, LogicalType::Double) => Box::new(IntAsDoubleReader),
		(SchemaNode::Long, LogicalType::Long) => Box::new(LongReader),
		(SchemaNode::Long, LogicalType::Float) => Box::new(LongAsFloatReader),
		(SchemaNode::Long, LogicalType::Double) => Box::new(LongAsDoubleReader),
		(SchemaNode::Float, LogicalType::Float) => Box::new(FloatReader),
		(SchemaNode::Float, LogicalType::Double) => Box::new(FloatAsDoubleReader),
		(SchemaNode::Double, LogicalType::Double) => Box::new(DoubleReader),
		(SchemaNode::String, LogicalType::String) => Box::new(StringReader),
		(SchemaNode::String, LogicalType::Bytes) => Box::new(StringAsBytesReader),
		(SchemaNode::Bytes, LogicalType::Bytes) => Box::new(BytesReader),
		(SchemaNode::Bytes, LogicalType::String) => Box::new(BytesAsStringReader),
		(SchemaNode::Fixed(f), LogicalType::Fixed(_)) => Box::new(FixedReader::new(f.size)),
		(SchemaNode::Uuid, LogicalType::Uuid) => Box::new(UuidReader),
		(SchemaNode::Date, LogicalType::Date) => Box::new(DateReader),
		(SchemaNode::TimeMillis, LogicalType::TimeMicros) | (SchemaNode::TimeMicros, LogicalType::TimeMicros) => {
			Box::new(MicrosReader::new(MicrosKind::Time))
		}
		(SchemaNode::TimestampMillis, LogicalType::TimestampMicros)
		| (SchemaNode::TimestampMicros, LogicalType::TimestampMicros) => {
			Box::new(MicrosReader::new(MicrosKind::Timestamp))
		}
		(SchemaNode::Decimal(d), LogicalType::Decimal { scale, .. }) => {
			let encoding = match d.repr {
				crate::schema::DecimalRepr::Bytes => DecimalEncoding::Bytes,
				crate::schema::DecimalRepr::Fixed(size) => DecimalEncoding::Fixed(size),
			};
			Box::new(DecimalReader::new(encoding, *scale))
		}
		(SchemaNode::Enum(e), _) => Box::new(EnumReader::new(e.symbols.clone())),
		(SchemaNode::Bytes, LogicalType::Variant) | (SchemaNode::Record(_), LogicalType::Variant) => {
			Box::new(crate::value_reader::logical::VariantReader)
		}
		(SchemaNode::Array(elem), LogicalType::List(expected_elem)) => {
			let element = build_reader(writer, *elem, expected_elem, constants, row_cursor, positional)?;
			Box::new(ArrayReader::new(element))
		}
		(SchemaNode::Map(values), LogicalType::Map(_, expected_values)) => {
			let value = build_reader(writer, *values, expected_values, constants, row_cursor, positional)?;
			Box::new(MapReader::new(value))
		}
		(SchemaNode::Record(record), LogicalType::Struct(expected_struct)) => {
			let plan = build_struct_plan(expected_struct, writer, record, constants, row_cursor, positional)?;
			Box::new(PlannedStructReader::new(
				plan,
				expected_struct.len(),
				crate::value::GenericRecordFactory,
			))
		}
		(SchemaNode::Record(record), _) => {
			// Not projected as a struct (e.g. nested record reached only while
			// building a skip-only reader): skip its fields one by one.
			let fields = record
				.fields
				.iter()
				.map(|f| build_reader_for_writer_node(writer, f.schema, constants, row_cursor, positional))
				.collect::<Result<Vec<_>, _>>()?;
			Box::new(SkipStructReader::new(fields))
		}
		(other, expected) => {
			return Err(PlanError::TypeMismatch {
				writer_type: node_kind(other).to_owned(),
				expected_type: format!("{expected:?}"),
			})
		}
	})
}

fn build_union_reader(
	writer: &WriterSchema,
	union: &crate::schema::Union,
	expected: &LogicalType,
	constants: &HashMap<i32, Value>,
	row_cursor: &RowCursor,
	positional: PositionalContext,
) -> Result<Box<dyn ValueReader>, PlanError> {
	let branches = union
		.variants
		.iter()
		.map(|variant| {
			if matches!(writer.node(*variant), SchemaNode::Null) {
				Ok(Box::new(NullReader) as Box<dyn ValueReader>)
			} else {
				build_reader(writer, *variant, expected, constants, row_cursor, positional)
			}
		})
		.collect::<Result<Vec<_>, _>>()?;
	Ok(Box::new(UnionReader::new(branches)))
}
