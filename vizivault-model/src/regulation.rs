//! Regulations and their rule trees.
//!
//! A [`Regulation`] owns at most one [`RegulationRule`] tree. Rule nodes are a
//! closed set of kinds; the wire `type` discriminator is derived from the
//! variant and cannot drift from it:
//!
//! | Variant       | `type`      |
//! |---------------|-------------|
//! | `Conjunctive` | `all`       |
//! | `Disjunctive` | `any`       |
//! | `Attribute`   | `attribute` |
//! | `Tag`         | `tag`       |
//! | `User`        | `user`      |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::timestamp;

/// How an attribute rule combines its attribute keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeListOperator {
    /// Matches if the entity holds any of the keys.
    Any,
    /// Matches if the entity holds none of the keys.
    None,
}

/// How a tag rule combines its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagListOperator {
    Any,
    None,
    All,
}

/// Comparison applied by a user rule to an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserValuePredicate {
    #[serde(rename = "eq")]
    Equals,
    #[serde(rename = "neq")]
    NotEquals,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "leq")]
    LessOrEqual,
    #[serde(rename = "geq")]
    GreaterOrEqual,
    Before,
    After,
}

impl AttributeListOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            AttributeListOperator::Any => "any",
            AttributeListOperator::None => "none",
        }
    }
}

impl TagListOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            TagListOperator::Any => "any",
            TagListOperator::None => "none",
            TagListOperator::All => "all",
        }
    }
}

impl UserValuePredicate {
    pub const fn as_str(self) -> &'static str {
        match self {
            UserValuePredicate::Equals => "eq",
            UserValuePredicate::NotEquals => "neq",
            UserValuePredicate::LessThan => "lt",
            UserValuePredicate::GreaterThan => "gt",
            UserValuePredicate::LessOrEqual => "leq",
            UserValuePredicate::GreaterOrEqual => "geq",
            UserValuePredicate::Before => "before",
            UserValuePredicate::After => "after",
        }
    }
}

impl FromStr for AttributeListOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(AttributeListOperator::Any),
            "none" => Ok(AttributeListOperator::None),
            other => Err(ModelError::InvalidArgument(format!(
                "unknown attribute list operator: {other}"
            ))),
        }
    }
}

impl FromStr for TagListOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(TagListOperator::Any),
            "none" => Ok(TagListOperator::None),
            "all" => Ok(TagListOperator::All),
            other => Err(ModelError::InvalidArgument(format!(
                "unknown tag list operator: {other}"
            ))),
        }
    }
}

impl FromStr for UserValuePredicate {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(UserValuePredicate::Equals),
            "neq" => Ok(UserValuePredicate::NotEquals),
            "lt" => Ok(UserValuePredicate::LessThan),
            "gt" => Ok(UserValuePredicate::GreaterThan),
            "leq" => Ok(UserValuePredicate::LessOrEqual),
            "geq" => Ok(UserValuePredicate::GreaterOrEqual),
            "before" => Ok(UserValuePredicate::Before),
            "after" => Ok(UserValuePredicate::After),
            other => Err(ModelError::InvalidArgument(format!(
                "unknown user value predicate: {other}"
            ))),
        }
    }
}

impl fmt::Display for AttributeListOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TagListOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UserValuePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a regulation's rule tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegulationRule {
    /// All child rules must match.
    #[serde(rename = "all")]
    Conjunctive {
        #[serde(default)]
        constraints: Vec<RegulationRule>,
    },
    /// At least one child rule must match.
    #[serde(rename = "any")]
    Disjunctive {
        #[serde(default)]
        constraints: Vec<RegulationRule>,
    },
    /// Presence or absence of attribute keys.
    #[serde(rename = "attribute")]
    Attribute {
        #[serde(default)]
        attributes: Vec<String>,
        operator: AttributeListOperator,
    },
    #[serde(rename = "tag")]
    Tag {
        #[serde(default)]
        tags: Vec<String>,
        operator: TagListOperator,
    },
    /// Compares one attribute's value against a literal.
    #[serde(rename = "user")]
    User {
        attribute: String,
        predicate: UserValuePredicate,
        value: serde_json::Value,
    },
}

impl RegulationRule {
    pub fn all() -> Self {
        RegulationRule::Conjunctive {
            constraints: Vec::new(),
        }
    }

    pub fn any() -> Self {
        RegulationRule::Disjunctive {
            constraints: Vec::new(),
        }
    }

    pub fn attribute<I, S>(attributes: I, operator: AttributeListOperator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RegulationRule::Attribute {
            attributes: attributes.into_iter().map(Into::into).collect(),
            operator,
        }
    }

    pub fn tag<I, S>(tags: I, operator: TagListOperator) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RegulationRule::Tag {
            tags: tags.into_iter().map(Into::into).collect(),
            operator,
        }
    }

    pub fn user(
        attribute: impl Into<String>,
        predicate: UserValuePredicate,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        RegulationRule::User {
            attribute: attribute.into(),
            predicate,
            value: value.into(),
        }
    }

    /// The wire discriminator of this node.
    pub const fn rule_type(&self) -> &'static str {
        match self {
            RegulationRule::Conjunctive { .. } => "all",
            RegulationRule::Disjunctive { .. } => "any",
            RegulationRule::Attribute { .. } => "attribute",
            RegulationRule::Tag { .. } => "tag",
            RegulationRule::User { .. } => "user",
        }
    }

    /// Appends a child to a conjunctive or disjunctive node.
    ///
    /// Leaf nodes have no children; adding to one fails with
    /// [`ModelError::InvalidArgument`].
    pub fn add_rule(&mut self, rule: RegulationRule) -> Result<(), ModelError> {
        match self {
            RegulationRule::Conjunctive { constraints }
            | RegulationRule::Disjunctive { constraints } => {
                constraints.push(rule);
                Ok(())
            }
            leaf => Err(ModelError::InvalidArgument(format!(
                "cannot add a child rule to a '{}' rule",
                leaf.rule_type()
            ))),
        }
    }

    /// Builder form of [`RegulationRule::add_rule`]. Fails the same way on
    /// leaf nodes.
    pub fn with_rule(mut self, rule: RegulationRule) -> Result<Self, ModelError> {
        self.add_rule(rule)?;
        Ok(self)
    }

    /// Child rules of a composite node; empty for leaves.
    pub fn children(&self) -> &[RegulationRule] {
        match self {
            RegulationRule::Conjunctive { constraints }
            | RegulationRule::Disjunctive { constraints } => constraints,
            _ => &[],
        }
    }
}

/// A named policy whose rule tree decides when it applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regulation {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RegulationRule>,
    #[serde(
        rename = "createdDate",
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing
    )]
    created_at: Option<DateTime<Utc>>,
    #[serde(
        rename = "modifiedDate",
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing
    )]
    modified_at: Option<DateTime<Utc>>,
}

impl Regulation {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            url: None,
            rule: None,
            created_at: None,
            modified_at: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: RegulationRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }
}
