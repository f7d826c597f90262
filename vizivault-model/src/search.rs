use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An equality constraint on one attribute's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueQuery {
    pub attribute: String,
    pub value: serde_json::Value,
}

/// Query descriptor for the vault's search endpoint.
///
/// Unset filters are left out of the serialized request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub values: Vec<ValueQuery>,
    /// Regulation keys the matching attributes must fall under.
    #[serde(default)]
    pub regulations: Vec<String>,
    /// Attribute keys the matching entities must hold.
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_created_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_modified_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_modified_date: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// A request with a single `attribute == value` constraint.
    pub fn for_value(attribute: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new().with_value_query(attribute, value)
    }

    pub fn add_value_query(
        &mut self,
        attribute: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) {
        self.values.push(ValueQuery {
            attribute: attribute.into(),
            value: value.into(),
        });
    }

    #[must_use]
    pub fn with_value_query(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.add_value_query(attribute, value);
        self
    }

    #[must_use]
    pub fn with_regulation(mut self, regulation: impl Into<String>) -> Self {
        self.regulations.push(regulation.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: impl Into<String>) -> Self {
        self.sensitivity = Some(sensitivity.into());
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Restricts results to a location; `None` parts are left unset.
    #[must_use]
    pub fn with_location(
        mut self,
        country: Option<&str>,
        subdivision: Option<&str>,
        city: Option<&str>,
    ) -> Self {
        self.country = country.map(str::to_string);
        self.subdivision = subdivision.map(str::to_string);
        self.city = city.map(str::to_string);
        self
    }

    #[must_use]
    pub fn created_between(
        mut self,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Self {
        self.min_created_date = min;
        self.max_created_date = max;
        self
    }

    #[must_use]
    pub fn modified_between(
        mut self,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Self {
        self.min_modified_date = min;
        self.max_modified_date = max;
        self
    }
}

/// Body of a search call: the query plus its page window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedSearch<'a> {
    pub query: &'a SearchRequest,
    pub page: u32,
    pub count: u32,
}
