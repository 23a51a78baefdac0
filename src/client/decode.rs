use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::Result;
use crate::error::{Error, ProtocolError};

/// Raw JSON-RPC result, tagged by shape. List methods answer with an
/// array of records, create/delete acknowledgements with a map of id
/// arrays, and a few methods (login, version) with a bare scalar.
#[derive(Clone, Debug)]
pub enum RpcResult {
    Array(Vec<Value>),
    Map(Map<String, Value>),
    Scalar(Value),
}

impl RpcResult {
    pub(crate) fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(items),
            Value::Object(map) => Self::Map(map),
            other => Self::Scalar(other),
        }
    }

    /// Decode an array result into typed records. Unknown fields are
    /// ignored; absent optional fields keep their default value, and
    /// nested collections decode recursively.
    ///
    /// # Errors
    ///
    /// `ProtocolError` when the result is not an array or a record does
    /// not fit the target shape.
    pub fn into_records<T>(self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let Self::Array(items) = self else {
            return Err(ProtocolError::UnexpectedShape {
                expected: "array of records",
            }
            .into());
        };
        items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|err| {
                    ProtocolError::Json {
                        message: format!("error decoding record: {err}"),
                    }
                    .into()
                })
            })
            .collect()
    }

    /// Decode an array result that must contain exactly one record.
    ///
    /// # Errors
    ///
    /// `Error::ExpectedOneResult` when the array holds zero or several
    /// records.
    pub fn into_single<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        exactly_one(self.into_records()?)
    }

    /// Extract the generated ids a create/delete acknowledgement carries
    /// under the entity's plural id key. Numeric ids (older servers
    /// return floats) are normalized to strings.
    ///
    /// # Errors
    ///
    /// `Error::CountMismatch` when the server returns a different number
    /// of ids than records were submitted.
    pub fn generated_ids(&self, field: &'static str, expected: usize) -> Result<Vec<String>> {
        let Self::Map(map) = self else {
            return Err(ProtocolError::UnexpectedShape {
                expected: "map with id array",
            }
            .into());
        };
        let Some(Value::Array(raw)) = map.get(field) else {
            return Err(ProtocolError::MissingField { field }.into());
        };
        let mut ids = Vec::with_capacity(raw.len());
        for value in raw {
            match value {
                Value::String(id) => ids.push(id.clone()),
                Value::Number(n) => ids.push(format_number_id(n)),
                _ => {
                    return Err(ProtocolError::UnexpectedShape {
                        expected: "string or integer id",
                    }
                    .into());
                }
            }
        }
        if ids.len() != expected {
            return Err(Error::CountMismatch {
                expected,
                got: ids.len(),
            });
        }
        Ok(ids)
    }

    /// Scalar string result (session token, API version).
    ///
    /// # Errors
    ///
    /// `ProtocolError` when the result is not a string.
    pub fn into_scalar_string(self) -> Result<String> {
        match self {
            Self::Scalar(Value::String(value)) => Ok(value),
            _ => Err(ProtocolError::UnexpectedShape {
                expected: "scalar string",
            }
            .into()),
        }
    }

    /// The untyped result, for callers driving methods this crate has no
    /// wrapper for.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Array(items) => Value::Array(items),
            Self::Map(map) => Value::Object(map),
            Self::Scalar(value) => value,
        }
    }
}

pub(crate) fn exactly_one<T>(records: Vec<T>) -> Result<T> {
    match <[T; 1]>::try_from(records) {
        Ok([record]) => Ok(record),
        Err(records) => Err(Error::ExpectedOneResult {
            got: records.len(),
        }),
    }
}

fn format_number_id(n: &serde_json::Number) -> String {
    n.as_i64().map_or_else(
        || n.as_f64().map_or_else(|| n.to_string(), |f| format!("{f:.0}")),
        |i| i.to_string(),
    )
}
