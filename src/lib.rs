//! Schema-resolving Avro value readers for Iceberg-shaped projections
//!
//! This crate is the value-reader layer of an Iceberg-style Avro reader: it
//! turns a writer's physical Avro record schema plus a caller's expected
//! struct shape into a [plan](plan) of [`ValueReader`](value_reader::ValueReader)s,
//! then walks that plan once per row against a [`Decoder`](decoder::Decoder)
//! to materialize [`Value`](value::Value) trees (or, via [`RecordFactory`]
//! implementations, directly into caller-supplied Rust types).
//!
//! It deliberately stops at the [`Decoder`](decoder::Decoder) boundary: framing
//! (object container files, block sync markers), compression codecs and
//! checksums are a different layer's job. [`decoder::BinaryDecoder`] is
//! provided as a minimal, directly testable [`Decoder`](decoder::Decoder) over
//! raw Avro binary encoding, for callers (and this crate's own tests) that
//! don't need that framing layer at all.
//!
//! ```
//! use std::collections::HashMap;
//! use iceberg_avro_values::decoder::{BinaryDecoder, Decoder};
//! use iceberg_avro_values::plan::{build_plan, PositionalContext};
//! use iceberg_avro_values::schema::{LogicalType, NestedField, StructType, WriterSchema};
//! use iceberg_avro_values::value::{GenericRecordFactory, Value};
//! use iceberg_avro_values::value_reader::positional::RowCursor;
//! use iceberg_avro_values::value_reader::struct_reader::PlannedStructReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let writer_schema: WriterSchema = r#"{
//!   "type": "record",
//!   "name": "row",
//!   "fields": [
//!     {"name": "id", "type": "long", "field-id": 1},
//!     {"name": "name", "type": "string", "field-id": 2}
//!   ]
//! }"#
//! .parse()?;
//!
//! let expected = StructType::new(vec![
//!     NestedField::required(1, "id", LogicalType::Long),
//!     NestedField::optional(2, "name", LogicalType::String),
//! ]);
//!
//! let row_cursor = RowCursor::new(0);
//! let plan = build_plan(
//!     &expected,
//!     &writer_schema,
//!     writer_schema.root(),
//!     &HashMap::new(),
//!     &row_cursor,
//!     PositionalContext::default(),
//! )?;
//! let mut reader = PlannedStructReader::with_row_cursor(plan, expected.len(), GenericRecordFactory, row_cursor);
//!
//! // 1 (long varint zig-zag = 2), then "ab" (length-prefixed string)
//! let bytes = [0x02, 0x04, b'a', b'b'];
//! let mut decoder = BinaryDecoder::from_slice(&bytes);
//! let record = reader.read_into(&mut decoder, None)?;
//! assert_eq!(record.fields()[0], Value::Long(1));
//! assert_eq!(record.fields()[1], Value::String("ab".to_owned()));
//! # Ok(())
//! # }
//! ```

pub mod decoder;
pub mod error;
pub mod io;
pub mod plan;
pub mod schema;
pub mod value;
pub mod value_reader;

pub use error::{DecodeError, PlanError, SchemaError};
