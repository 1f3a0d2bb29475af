//! XPath evaluation with fixed namespace bindings.
//!
//! Selectors in the entry schemas reference both the Atom namespace (`atom:`)
//! and the Connections extension namespace (`snx:`). The bindings are held by
//! an immutable [`XPathContext`] which hands out an [`Evaluator`] per parsed
//! document. An evaluator compiles each distinct selector once.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use sxd_document::Package;
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value, XPath};

use crate::error::{ParseError, ParseResult};

/// Atom syndication namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
/// IBM Connections extension namespace.
pub const SNX_NS: &str = "http://www.ibm.com/xmlns/prod/sn";

/// The scalar result of a non-node selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Result of `string(...)`, or the string value of a node-set.
    Text(String),
    /// Result of `number(...)`; `NaN` for empty content.
    Number(f64),
    /// Result of `boolean(...)`.
    Boolean(bool),
}

impl Scalar {
    /// XPath `string()` coercion of the scalar.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(n) if n.is_nan() => "NaN".to_string(),
            Self::Number(n) => n.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

/// Namespace bindings used for every selector evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathContext {
    namespaces: Vec<(String, String)>,
}

impl Default for XPathContext {
    /// The `atom` and `snx` bindings required by the entry schemas.
    fn default() -> Self {
        Self::empty()
            .with_namespace("atom", ATOM_NS)
            .with_namespace("snx", SNX_NS)
    }
}

impl XPathContext {
    /// A context without any namespace binding.
    pub fn empty() -> Self {
        Self {
            namespaces: Vec::new(),
        }
    }

    /// Binds `prefix` to `uri`, replacing an earlier binding of the prefix.
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.namespaces.retain(|(p, _)| *p != prefix);
        self.namespaces.push((prefix, uri.into()));
        self
    }

    /// Returns the namespace URI bound to `prefix`.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Creates an evaluator carrying these bindings.
    pub fn evaluator<'d>(&self) -> Evaluator<'d> {
        let mut context = Context::new();
        for (prefix, uri) in &self.namespaces {
            context.set_namespace(prefix, uri);
        }
        Evaluator {
            factory: Factory::new(),
            context,
            compiled: RefCell::new(HashMap::new()),
        }
    }
}

/// Evaluates selectors against nodes of one document.
pub struct Evaluator<'d> {
    factory: Factory,
    context: Context<'d>,
    compiled: RefCell<HashMap<String, XPath>>,
}

impl<'d> Evaluator<'d> {
    /// Evaluates `selector` relative to `node`.
    pub fn evaluate(&self, selector: &str, node: Node<'d>) -> ParseResult<Value<'d>> {
        let mut compiled = self.compiled.borrow_mut();
        let xpath = match compiled.entry(selector.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let xpath = self
                    .factory
                    .build(selector)
                    .map_err(|e| ParseError::selector(selector, format!("{e:?}")))?
                    .ok_or_else(|| ParseError::selector(selector, "empty XPath expression"))?;
                entry.insert(xpath)
            }
        };
        xpath
            .evaluate(&self.context, node)
            .map_err(|e| ParseError::selector(selector, format!("{e:?}")))
    }

    /// Number of distinct selectors compiled so far.
    #[cfg(test)]
    fn compiled_count(&self) -> usize {
        self.compiled.borrow().len()
    }

    /// Evaluates a node-set selector, returning nodes in document order.
    pub fn select_nodes(&self, selector: &str, node: Node<'d>) -> ParseResult<Vec<Node<'d>>> {
        match self.evaluate(selector, node)? {
            Value::Nodeset(nodes) => Ok(nodes.document_order()),
            other => Err(ParseError::selector(
                selector,
                format!("expected a node-set, got {other:?}"),
            )),
        }
    }

    /// Evaluates a node-set selector, returning the first node in document
    /// order.
    pub fn select_first(&self, selector: &str, node: Node<'d>) -> ParseResult<Option<Node<'d>>> {
        Ok(self.select_nodes(selector, node)?.into_iter().next())
    }

    /// Evaluates a scalar selector.
    ///
    /// Node-set results are coerced the way XPath `string()` does it: the
    /// string value of the first node, or the empty string.
    pub fn select_scalar(&self, selector: &str, node: Node<'d>) -> ParseResult<Scalar> {
        Ok(match self.evaluate(selector, node)? {
            Value::String(text) => Scalar::Text(text),
            Value::Number(n) => Scalar::Number(n),
            Value::Boolean(b) => Scalar::Boolean(b),
            Value::Nodeset(nodes) => Scalar::Text(
                nodes
                    .document_order()
                    .first()
                    .map(|n| n.string_value())
                    .unwrap_or_default(),
            ),
        })
    }
}

/// Returns the value of attribute `name` when `node` is an element.
pub fn attribute<'d>(node: Node<'d>, name: &str) -> Option<&'d str> {
    match node {
        Node::Element(element) => element.attribute_value(name),
        _ => None,
    }
}

/// Parses XML text into a document package.
pub fn parse_xml(xml: &str) -> ParseResult<Package> {
    sxd_document::parser::parse(xml).map_err(|e| ParseError::Xml(format!("{e:?}")))
}
