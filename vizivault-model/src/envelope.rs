use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;

/// The `{ "data": ... }` wrapper the vault puts around every payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Batch body for an attribute upsert.
pub type AttributeBatch<'a> = DataEnvelope<Vec<&'a Attribute>>;

/// Error body returned by the vault on non-success responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
