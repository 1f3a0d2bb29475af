//! Declarative field extraction.
//!
//! A [`ParseSchema`] lists output fields together with a [`FieldSpec`] that
//! says how to pull each field out of an XML node. [`parse_node`] evaluates a
//! schema against one node and returns a [`Record`].
//!
//! ```ignore
//! let schema = ParseSchema::new()
//!     .field("title", "string(atom:title)")
//!     .field("updated", FieldSpec::scalar_with("string(atom:updated)", to_date))
//!     .field("tags", FieldSpec::multi("atom:category", category_terms));
//! let record = parse_node(&evaluator, node, &schema)?;
//! ```

use std::fmt;

use sxd_xpath::nodeset::Node;
use tracing::trace;

use crate::error::ParseResult;
use crate::record::{FieldValue, Record};
use crate::xpath::{Evaluator, Scalar};

/// Transform applied to a scalar selector result.
pub type ScalarTransform = fn(Scalar) -> ParseResult<FieldValue>;

/// Transform applied to the first node matched by a selector.
pub type NodeTransform = for<'d> fn(&Evaluator<'d>, Option<Node<'d>>) -> ParseResult<FieldValue>;

/// Transform reducing every node matched by a selector.
pub type NodesTransform = for<'d> fn(&Evaluator<'d>, &[Node<'d>]) -> ParseResult<FieldValue>;

/// How to extract one field.
#[derive(Clone)]
pub enum FieldSpec {
    /// The selector returns a string, number or boolean.
    Scalar {
        selector: &'static str,
        transform: Option<ScalarTransform>,
    },
    /// The selector returns nodes; the first one (if any) goes to the
    /// transform.
    Node {
        selector: &'static str,
        transform: NodeTransform,
    },
    /// The selector returns zero or more nodes, reduced by the transform.
    Multi {
        selector: &'static str,
        transform: NodesTransform,
    },
}

impl FieldSpec {
    /// Scalar selector without transform.
    pub const fn scalar(selector: &'static str) -> Self {
        Self::Scalar {
            selector,
            transform: None,
        }
    }

    /// Scalar selector whose result goes through `transform`.
    pub const fn scalar_with(selector: &'static str, transform: ScalarTransform) -> Self {
        Self::Scalar {
            selector,
            transform: Some(transform),
        }
    }

    pub const fn node(selector: &'static str, transform: NodeTransform) -> Self {
        Self::Node {
            selector,
            transform,
        }
    }

    pub const fn multi(selector: &'static str, transform: NodesTransform) -> Self {
        Self::Multi {
            selector,
            transform,
        }
    }

    pub fn selector(&self) -> &'static str {
        match self {
            Self::Scalar { selector, .. }
            | Self::Node { selector, .. }
            | Self::Multi { selector, .. } => selector,
        }
    }

    fn extract<'d>(&self, eval: &Evaluator<'d>, node: Node<'d>) -> ParseResult<FieldValue> {
        match *self {
            Self::Scalar {
                selector,
                transform,
            } => {
                let scalar = eval.select_scalar(selector, node)?;
                match transform {
                    Some(transform) => transform(scalar),
                    None => Ok(scalar.into()),
                }
            }
            Self::Node {
                selector,
                transform,
            } => transform(eval, eval.select_first(selector, node)?),
            Self::Multi {
                selector,
                transform,
            } => transform(eval, &eval.select_nodes(selector, node)?),
        }
    }
}

impl From<&'static str> for FieldSpec {
    fn from(selector: &'static str) -> Self {
        Self::scalar(selector)
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Scalar {
                transform: None, ..
            } => "scalar",
            Self::Scalar { .. } => "scalar+transform",
            Self::Node { .. } => "node",
            Self::Multi { .. } => "multi",
        };
        f.debug_struct("FieldSpec")
            .field("kind", &kind)
            .field("selector", &self.selector())
            .finish()
    }
}

/// Output field names mapped to their extraction specs.
#[derive(Debug, Clone, Default)]
pub struct ParseSchema {
    fields: Vec<(&'static str, FieldSpec)>,
}

impl ParseSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field. A name that is already present gets its spec replaced.
    pub fn field(mut self, name: &'static str, spec: impl Into<FieldSpec>) -> Self {
        let spec = spec.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = spec,
            None => self.fields.push((name, spec)),
        }
        self
    }

    /// Adds every field of `other`, replacing fields with the same name.
    pub fn extend(self, other: &ParseSchema) -> Self {
        other
            .fields
            .iter()
            .fold(self, |schema, (name, spec)| schema.field(*name, spec.clone()))
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, s)| s)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Evaluates every field of `schema` against `node`.
///
/// Selector failures abort the whole record; empty content never does.
pub fn parse_node<'d>(
    eval: &Evaluator<'d>,
    node: Node<'d>,
    schema: &ParseSchema,
) -> ParseResult<Record> {
    let mut record = Record::new();
    for (name, spec) in &schema.fields {
        let value = spec.extract(eval, node)?;
        trace!(field = *name, spec = ?spec, "extracted field");
        record.insert(*name, value);
    }
    Ok(record)
}
