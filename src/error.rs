//! Error types for decoding and for read-plan construction

use std::borrow::Cow;

/// Any error that may happen while a [`ValueReader`](crate::value_reader::ValueReader)
/// pulls bytes from a [`Decoder`](crate::decoder::Decoder)
#[derive(thiserror::Error)]
#[error("{}", inner.value)]
pub struct DecodeError {
	inner: Box<ErrorInner>,
}

impl std::fmt::Debug for DecodeError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.inner.io_error.as_ref() {
			Some(io_error) => write!(f, "{}: {}", self.inner.value, io_error),
			None => std::fmt::Debug::fmt(&*self.inner.value, f),
		}
	}
}

struct ErrorInner {
	value: Cow<'static, str>,
	io_error: Option<std::io::Error>,
}

impl DecodeError {
	pub(crate) fn new(s: &'static str) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				value: Cow::Borrowed(s),
				io_error: None,
			}),
		}
	}
	pub(crate) fn custom(s: impl Into<String>) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				value: Cow::Owned(s.into()),
				io_error: None,
			}),
		}
	}
	pub(crate) fn unexpected_eof() -> Self {
		Self::new("Unexpected end of stream while decoding")
	}
	pub(crate) fn io(io_error: std::io::Error) -> Self {
		Self {
			inner: Box::new(ErrorInner {
				value: Cow::Borrowed("Encountered IO error when attempting to read for decoding"),
				io_error: Some(io_error),
			}),
		}
	}

	/// Invalid Avro decimal encoding: neither `fixed` nor `bytes`
	pub fn invalid_decimal_encoding(found: impl std::fmt::Display) -> Self {
		Self::custom(format!(
			"Decimal logical type must be encoded as `fixed` or `bytes`, found `{found}`"
		))
	}

	/// If this error was caused by an IO error, return it
	pub fn io_error(&self) -> Option<&std::io::Error> {
		self.inner.io_error.as_ref()
	}
}

/// Any error that may happen while a [read plan](crate::plan) is being built
/// from an expected schema, a writer schema and a constant map
#[derive(thiserror::Error, Debug)]
pub enum PlanError {
	/// An expected field has no physical counterpart in the writer schema, no
	/// constant supplied for its field id, no `initial_default`, and is not
	/// optional
	#[error("Required field `{name}` (field id {field_id}) is missing from the writer schema, \
		has no default value and no constant was supplied for it")]
	MissingRequiredField { name: String, field_id: i32 },

	/// The writer schema handed to the plan builder wasn't shaped the way the
	/// caller claimed (e.g. the root wasn't a `record`)
	#[error("invalid writer schema: {0}")]
	InvalidWriterSchema(String),

	/// No resolution rule exists between the writer's physical type and the
	/// expected logical type for a field
	#[error("cannot resolve writer type `{writer_type}` into expected type `{expected_type}`")]
	TypeMismatch {
		writer_type: String,
		expected_type: String,
	},
}

/// Any error that may happen while parsing a writer schema document
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
	#[error("failed to parse schema JSON: {0}")]
	Json(#[from] serde_json::Error),
	#[error("invalid schema: {0}")]
	Invalid(String),
	#[error("schema references unknown named type `{0}`")]
	UnknownReference(String),
}
