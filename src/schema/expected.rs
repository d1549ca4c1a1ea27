//! The "expected" schema: the logical shape the caller wants materialized,
//! independent of whatever the writer schema on disk happens to look like

use crate::value::Value;

/// An ordered list of fields the caller wants to see materialized
///
/// Corresponds to the spec's "StructType".
#[derive(Debug, Clone)]
pub struct StructType {
	fields: Vec<NestedField>,
}

impl StructType {
	pub fn new(fields: Vec<NestedField>) -> Self {
		Self { fields }
	}

	pub fn fields(&self) -> &[NestedField] {
		&self.fields
	}

	/// The positional index, within this struct, of the field carrying
	/// `field_id`, if any
	pub fn position_of(&self, field_id: i32) -> Option<usize> {
		self.fields.iter().position(|f| f.field_id == field_id)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// One field of an expected [`StructType`]
#[derive(Debug, Clone)]
pub struct NestedField {
	pub field_id: i32,
	pub name: String,
	pub field_type: LogicalType,
	pub optional: bool,
	/// Value to materialize when this field has no physical counterpart in
	/// the writer schema and no constant was supplied for it
	pub initial_default: Option<Value>,
}

impl NestedField {
	pub fn required(field_id: i32, name: impl Into<String>, field_type: LogicalType) -> Self {
		Self {
			field_id,
			name: name.into(),
			field_type,
			optional: false,
			initial_default: None,
		}
	}

	pub fn optional(field_id: i32, name: impl Into<String>, field_type: LogicalType) -> Self {
		Self {
			field_id,
			name: name.into(),
			field_type,
			optional: true,
			initial_default: None,
		}
	}

	pub fn with_default(mut self, default: Value) -> Self {
		self.initial_default = Some(default);
		self
	}
}

/// The logical type of an expected field
///
/// This is deliberately coarser than [`crate::schema::writer::SchemaNode`]:
/// it describes what the caller wants out, not how the writer happened to
/// encode it on disk.
#[derive(Debug, Clone)]
pub enum LogicalType {
	Boolean,
	Int,
	Long,
	Float,
	Double,
	String,
	Bytes,
	Fixed(usize),
	Uuid,
	Decimal { precision: usize, scale: u32 },
	Date,
	TimeMicros,
	TimestampMicros,
	Variant,
	List(Box<LogicalType>),
	Map(Box<LogicalType>, Box<LogicalType>),
	Struct(StructType),
}
