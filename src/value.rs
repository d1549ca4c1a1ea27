//! The materialized value tree produced by the value-reader core, and the
//! [`RecordFactory`] abstraction used to build structs out of it
//!
//! Avro/Iceberg readers in reflective languages build a record by looking up
//! a constructor and setters at runtime. Rust has no such reflection, so this
//! crate replaces it with an explicit factory: something that knows, at
//! compile time, how to create a `Target` and how to get/set its fields by
//! position. [`GenericRecordFactory`] is the reflection-free equivalent of
//! "just give me a generic record" (fields kept in a `Vec<Value>`);
//! [`IndexedRecordFactory`] is for a caller who already has a concrete Rust
//! type they want filled in directly.

use std::collections::HashMap;

/// One decoded value
///
/// A `Value` never carries a field id or a name: that bookkeeping lives in
/// the schema, not in the data.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize)]
pub enum Value {
	Null,
	Boolean(bool),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	String(String),
	Bytes(Vec<u8>),
	Fixed(Vec<u8>),
	Enum(usize, String),
	Uuid(u128),
	/// Unscaled value and scale are both carried inside `rust_decimal::Decimal`
	Decimal(rust_decimal::Decimal),
	Date(i32),
	TimeMicros(i64),
	TimestampMicros(i64),
	/// Raw `(metadata, value)` buffers of a `variant` logical type; this crate
	/// does not interpret the variant encoding itself
	Variant { metadata: Vec<u8>, value: Vec<u8> },
	Array(Vec<Value>),
	Map(HashMap<String, Value>),
	Record(GenericRecord),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}
}

/// A record whose fields are addressed positionally, backed by a plain `Vec`
///
/// This is the `Target` of [`GenericRecordFactory`].
#[derive(Debug, Clone, PartialEq, Default, serde_derive::Serialize)]
pub struct GenericRecord {
	fields: Vec<Value>,
}

impl GenericRecord {
	pub fn new(len: usize) -> Self {
		Self {
			fields: vec![Value::Null; len],
		}
	}

	pub fn fields(&self) -> &[Value] {
		&self.fields
	}

	pub fn into_fields(self) -> Vec<Value> {
		self.fields
	}
}

/// Something that knows how to build and fill in a record-shaped value,
/// addressed by the expected struct's field positions
///
/// A `PlannedStructReader`/`StructReader` is generic over `F: RecordFactory`
/// so the same read-plan walking logic works whether the caller wants a
/// [`GenericRecord`] or one of their own Rust structs.
pub trait RecordFactory {
	type Target;

	/// Allocate a fresh, all-default `Target` with `len` fields
	fn create(&self, len: usize) -> Self::Target;
	/// Take the value currently at `position`, leaving a placeholder behind
	fn get(&self, target: &mut Self::Target, position: usize) -> Value;
	/// Store `value` at `position`
	fn set(&self, target: &mut Self::Target, position: usize, value: Value);
}

/// The [`RecordFactory`] that materializes a [`GenericRecord`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericRecordFactory;

impl RecordFactory for GenericRecordFactory {
	type Target = GenericRecord;

	fn create(&self, len: usize) -> GenericRecord {
		GenericRecord::new(len)
	}

	fn get(&self, target: &mut GenericRecord, position: usize) -> Value {
		std::mem::replace(&mut target.fields[position], Value::Null)
	}

	fn set(&self, target: &mut GenericRecord, position: usize, value: Value) {
		target.fields[position] = value;
	}
}

/// A [`RecordFactory`] over a caller-provided Rust type `T`, built from three
/// plain function pointers instead of a derive macro or runtime reflection
///
/// Construct one per expected struct shape and hand it to
/// `PlannedStructReader`/`StructReader`.
pub struct IndexedRecordFactory<T> {
	new: fn() -> T,
	get: fn(&mut T, usize) -> Value,
	set: fn(&mut T, usize, Value),
}

impl<T> IndexedRecordFactory<T> {
	pub fn new(new: fn() -> T, get: fn(&mut T, usize) -> Value, set: fn(&mut T, usize, Value)) -> Self {
		Self { new, get, set }
	}
}

impl<T> RecordFactory for IndexedRecordFactory<T> {
	type Target = T;

	fn create(&self, _len: usize) -> T {
		(self.new)()
	}

	fn get(&self, target: &mut T, position: usize) -> Value {
		(self.get)(target, position)
	}

	fn set(&self, target: &mut T, position: usize, value: Value) {
		(self.set)(target, position, value)
	}
}
