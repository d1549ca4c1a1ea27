//! The writer schema: what the file actually contains
//!
//! Represented as a safe, arena-indexed graph of [`SchemaNode`]s rather than
//! the self-referential, pointer-based graph a hot per-row decode path would
//! want: the writer schema here is only walked once, at read-plan build time
//! (`crate::plan`), never per-row, so a plain index into a `Vec` is exactly
//! as fast as it needs to be and keeps this code entirely safe.
//!
//! Schemas are read directly off `serde_json::Value` with a small
//! hand-written recursive-descent reader rather than through a full
//! general-purpose schema crate: the writer schema this crate consumes is
//! always produced by an upstream Iceberg/Avro reader that already validated
//! it, so this module only needs to understand the narrow subset of the Avro
//! schema grammar used for field-id-tagged record schemas.

use std::collections::HashMap;

use crate::error::SchemaError;

/// A writer (file) schema, represented as an arena of [`SchemaNode`]s
///
/// Index into it with a [`SchemaKey`] (usually [`WriterSchema::root`]).
#[derive(Debug, Clone)]
pub struct WriterSchema {
	nodes: Vec<SchemaNode>,
}

impl WriterSchema {
	pub fn root(&self) -> SchemaKey {
		SchemaKey(0)
	}

	pub fn node(&self, key: SchemaKey) -> &SchemaNode {
		&self.nodes[key.0]
	}
}

impl std::ops::Index<SchemaKey> for WriterSchema {
	type Output = SchemaNode;
	fn index(&self, key: SchemaKey) -> &SchemaNode {
		self.node(key)
	}
}

impl std::str::FromStr for WriterSchema {
	type Err = SchemaError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let raw: serde_json::Value = serde_json::from_str(s)?;
		let mut nodes = Vec::new();
		let mut named: HashMap<String, SchemaKey> = HashMap::new();
		parse_node(&raw, &mut nodes, &mut named)?;
		Ok(WriterSchema { nodes })
	}
}

/// A location within a [`WriterSchema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaKey(usize);

/// One node of a [`WriterSchema`]
#[derive(Debug, Clone)]
pub enum SchemaNode {
	Null,
	Boolean,
	Int,
	Long,
	Float,
	Double,
	Bytes,
	String,
	Array(SchemaKey),
	Map(SchemaKey),
	Union(Union),
	Record(Record),
	Enum(EnumSchema),
	Fixed(FixedSchema),
	Decimal(DecimalSchema),
	Uuid,
	Date,
	TimeMillis,
	TimeMicros,
	TimestampMillis,
	TimestampMicros,
}

#[derive(Debug, Clone)]
pub struct Union {
	pub variants: Vec<SchemaKey>,
}

#[derive(Debug, Clone)]
pub struct Record {
	pub name: String,
	pub fields: Vec<RecordField>,
}

/// A field of a [`Record`]
///
/// `field_id` comes from the Avro `field-id` custom property (the Iceberg
/// convention this crate's plan builder matches expected fields against).
#[derive(Debug, Clone)]
pub struct RecordField {
	pub name: String,
	pub field_id: Option<i32>,
	pub schema: SchemaKey,
}

#[derive(Debug, Clone)]
pub struct EnumSchema {
	pub symbols: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FixedSchema {
	pub size: usize,
}

#[derive(Debug, Clone)]
pub struct DecimalSchema {
	pub precision: usize,
	pub scale: u32,
	pub repr: DecimalRepr,
}

#[derive(Debug, Clone)]
pub enum DecimalRepr {
	Bytes,
	Fixed(usize),
}

fn push(nodes: &mut Vec<SchemaNode>, node: SchemaNode) -> SchemaKey {
	nodes.push(node);
	SchemaKey(nodes.len() - 1)
}

fn field_id_of(obj: &serde_json::Map<String, serde_json::Value>) -> Option<i32> {
	obj.get("field-id")
		.and_then(|v| v.as_i64())
		.and_then(|v| i32::try_from(v).ok())
}

fn parse_node(
	value: &serde_json::Value,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, SchemaKey>,
) -> Result<SchemaKey, SchemaError> {
	match value {
		serde_json::Value::String(type_name) => parse_primitive_or_ref(type_name, nodes, named),
		serde_json::Value::Array(variants) => {
			// Reserve our own slot so self-referential records inside the union
			// still resolve, even though unions can't directly recurse into
			// themselves in valid Avro.
			let keys = variants
				.iter()
				.map(|v| parse_node(v, nodes, named))
				.collect::<Result<Vec<_>, _>>()?;
			Ok(push(nodes, SchemaNode::Union(Union { variants: keys })))
		}
		serde_json::Value::Object(obj) => parse_object(obj, nodes, named),
		other => Err(SchemaError::Invalid(format!(
			"schema node must be a string, array or object, found {other}"
		))),
	}
}

fn parse_primitive_or_ref(
	type_name: &str,
	nodes: &mut Vec<SchemaNode>,
	named: &HashMap<String, SchemaKey>,
) -> Result<SchemaKey, SchemaError> {
	Ok(match type_name {
		"null" => push(nodes, SchemaNode::Null),
		"boolean" => push(nodes, SchemaNode::Boolean),
		"int" => push(nodes, SchemaNode::Int),
		"long" => push(nodes, SchemaNode::Long),
		"float" => push(nodes, SchemaNode::Float),
		"double" => push(nodes, SchemaNode::Double),
		"bytes" => push(nodes, SchemaNode::Bytes),
		"string" => push(nodes, SchemaNode::String),
		other => *named
			.get(other)
			.ok_or_else(|| SchemaError::UnknownReference(other.to_owned()))?,
	})
}

fn parse_object(
	obj: &serde_json::Map<String, serde_json::Value>,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, SchemaKey>,
) -> Result<SchemaKey, SchemaError> {
	let type_field = obj
		.get("type")
		.ok_or_else(|| SchemaError::Invalid("schema object is missing `type`".to_owned()))?;
	let logical_type = obj.get("logicalType").and_then(|v| v.as_str());

	// `{"type": "long", "logicalType": "timestamp-micros"}` etc: the outer
	// object just annotates a primitive/fixed/bytes type
	if let serde_json::Value::String(type_name) = type_field {
		if let Some(logical) = logical_type {
			return parse_logical(type_name, logical, obj, nodes);
		}
		return parse_primitive_or_ref(type_name, nodes, named);
	}

	match type_field.as_str() {
		Some("array") => {
			let items = obj
				.get("items")
				.ok_or_else(|| SchemaError::Invalid("array schema is missing `items`".to_owned()))?;
			let items_key = parse_node(items, nodes, named)?;
			Ok(push(nodes, SchemaNode::Array(items_key)))
		}
		Some("map") => {
			let values = obj
				.get("values")
				.ok_or_else(|| SchemaError::Invalid("map schema is missing `values`".to_owned()))?;
			let values_key = parse_node(values, nodes, named)?;
			Ok(push(nodes, SchemaNode::Map(values_key)))
		}
		Some("record") => parse_record(obj, nodes, named),
		Some("enum") => {
			let symbols = obj
				.get("symbols")
				.and_then(|v| v.as_array())
				.ok_or_else(|| SchemaError::Invalid("enum schema is missing `symbols`".to_owned()))?
				.iter()
				.map(|v| {
					v.as_str()
						.map(str::to_owned)
						.ok_or_else(|| SchemaError::Invalid("enum symbol must be a string".to_owned()))
				})
				.collect::<Result<Vec<_>, _>>()?;
			Ok(push(nodes, SchemaNode::Enum(EnumSchema { symbols })))
		}
		Some("fixed") => {
			let size = obj
				.get("size")
				.and_then(|v| v.as_u64())
				.ok_or_else(|| SchemaError::Invalid("fixed schema is missing `size`".to_owned()))?
				as usize;
			if let Some(logical) = logical_type {
				if logical == "decimal" {
					return parse_decimal(obj, DecimalRepr::Fixed(size), nodes);
				}
				if logical == "duration" {
					// `duration` is out of scope for the value-reader core (Iceberg has
					// no corresponding logical type); decode as plain fixed bytes.
				}
			}
			Ok(push(nodes, SchemaNode::Fixed(FixedSchema { size })))
		}
		Some(other) => Err(SchemaError::Invalid(format!("unknown schema type `{other}`"))),
		None => Err(SchemaError::Invalid("`type` must be a string".to_owned())),
	}
}

fn parse_logical(
	type_name: &str,
	logical: &str,
	obj: &serde_json::Map<String, serde_json::Value>,
	nodes: &mut Vec<SchemaNode>,
) -> Result<SchemaKey, SchemaError> {
	Ok(match (type_name, logical) {
		("bytes", "decimal") => return parse_decimal(obj, DecimalRepr::Bytes, nodes),
		("string", "uuid") => push(nodes, SchemaNode::Uuid),
		("int", "date") => push(nodes, SchemaNode::Date),
		("int", "time-millis") => push(nodes, SchemaNode::TimeMillis),
		("long", "time-micros") => push(nodes, SchemaNode::TimeMicros),
		("long", "timestamp-millis") => push(nodes, SchemaNode::TimestampMillis),
		("long", "timestamp-micros") => push(nodes, SchemaNode::TimestampMicros),
		// Unknown logical type annotation: fall back to the underlying physical type
		(physical, _) => return parse_primitive_or_ref(physical, nodes, &HashMap::new()),
	})
}

fn parse_decimal(
	obj: &serde_json::Map<String, serde_json::Value>,
	repr: DecimalRepr,
	nodes: &mut Vec<SchemaNode>,
) -> Result<SchemaKey, SchemaError> {
	let precision = obj
		.get("precision")
		.and_then(|v| v.as_u64())
		.ok_or_else(|| SchemaError::Invalid("decimal schema is missing `precision`".to_owned()))?
		as usize;
	let scale = obj.get("scale").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
	Ok(push(
		nodes,
		SchemaNode::Decimal(DecimalSchema {
			precision,
			scale,
			repr,
		}),
	))
}

fn parse_record(
	obj: &serde_json::Map<String, serde_json::Value>,
	nodes: &mut Vec<SchemaNode>,
	named: &mut HashMap<String, SchemaKey>,
) -> Result<SchemaKey, SchemaError> {
	let name = obj
		.get("name")
		.and_then(|v| v.as_str())
		.ok_or_else(|| SchemaError::Invalid("record schema is missing `name`".to_owned()))?
		.to_owned();

	// Reserve the slot before parsing fields so a field can reference this
	// record by name (self-recursive records, e.g. linked lists).
	let key = push(nodes, SchemaNode::Null);
	named.insert(name.clone(), key);

	let raw_fields = obj
		.get("fields")
		.and_then(|v| v.as_array())
		.ok_or_else(|| SchemaError::Invalid("record schema is missing `fields`".to_owned()))?;

	let mut fields = Vec::with_capacity(raw_fields.len());
	for raw_field in raw_fields {
		let field_obj = raw_field
			.as_object()
			.ok_or_else(|| SchemaError::Invalid("record field must be an object".to_owned()))?;
		let field_name = field_obj
			.get("name")
			.and_then(|v| v.as_str())
			.ok_or_else(|| SchemaError::Invalid("record field is missing `name`".to_owned()))?
			.to_owned();
		let field_type = field_obj
			.get("type")
			.ok_or_else(|| SchemaError::Invalid("record field is missing `type`".to_owned()))?;
		let schema = parse_node(field_type, nodes, named)?;
		fields.push(RecordField {
			name: field_name,
			field_id: field_id_of(field_obj),
			schema,
		});
	}

	nodes[key.0] = SchemaNode::Record(Record { name, fields });
	Ok(key)
}
