//! Schema representations: what the writer wrote, and what the caller wants

pub mod expected;
pub mod reserved;
pub mod writer;

pub use expected::{LogicalType, NestedField, StructType};
pub use writer::{
	DecimalRepr, DecimalSchema, EnumSchema, FixedSchema, Record, RecordField, SchemaKey,
	SchemaNode, Union, WriterSchema,
};
