//! Tree node representation with shared handles.
//!
//! Each haystack value is held behind a `Node` handle. Handles are cheap to
//! clone and share the underlying value, so a node can appear in several
//! places in a tree, including inside its own descendants. The scan engine
//! flags circular references by handle identity, never by value equality.
//!
//! # Example
//!
//! ```
//! use treescan::tree::node::Node;
//! use serde_json::json;
//!
//! let root = Node::from(json!({"name": "treescan", "tags": ["glob", "tree"]}));
//! assert!(root.is_container());
//!
//! let tags = root.get("tags").unwrap();
//! assert!(tags.is_array());
//! assert_eq!(tags.at(0).unwrap(), Node::from(json!("glob")));
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::path::PathSegment;

/// A tree value: keyed container, indexed container, or scalar leaf.
///
/// Containers hold `Node` handles so sharing and cycles survive nesting.
/// Keyed containers preserve insertion order; traversal order of a scan is
/// key-insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A keyed container of name/value pairs.
    Object(IndexMap<String, Node>),
    /// An indexed container of ordered values.
    Array(Vec<Node>),
    /// A string leaf.
    String(String),
    /// A numeric leaf.
    Number(f64),
    /// A boolean leaf.
    Boolean(bool),
    /// A null leaf.
    Null,
}

impl Value {
    /// Returns true if this value is a keyed container.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns true if this value is an indexed container.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this value is a container of either kind.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }
}

/// A cheaply clonable handle to a tree node.
#[derive(Clone)]
pub struct Node {
    inner: Rc<RefCell<Value>>,
}

impl Node {
    /// Creates a new node holding the given value.
    pub fn new(value: Value) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// Creates a null node.
    pub fn null() -> Self {
        Node::new(Value::Null)
    }

    /// Returns an immutable borrow of the node's value.
    pub fn value(&self) -> Ref<'_, Value> {
        self.inner.borrow()
    }

    /// Returns a mutable borrow of the node's value.
    pub fn value_mut(&self) -> RefMut<'_, Value> {
        self.inner.borrow_mut()
    }

    /// Returns true if the node is a container of either kind.
    pub fn is_container(&self) -> bool {
        self.value().is_container()
    }

    /// Returns true if the node is an indexed container.
    pub fn is_array(&self) -> bool {
        self.value().is_array()
    }

    /// Returns true if both handles refer to the same underlying node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the child at the given path segment, if any.
    pub fn child(&self, segment: &PathSegment) -> Option<Node> {
        match (&*self.value(), segment) {
            (Value::Object(fields), PathSegment::Key(key)) => fields.get(key).cloned(),
            (Value::Array(items), PathSegment::Index(idx)) => items.get(*idx).cloned(),
            _ => None,
        }
    }

    /// Returns the child under a map key, if any.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.child(&PathSegment::Key(key.to_string()))
    }

    /// Returns the child at an array index, if any.
    pub fn at(&self, index: usize) -> Option<Node> {
        self.child(&PathSegment::Index(index))
    }

    /// Returns the child segments of this node in traversal order.
    ///
    /// Keyed containers yield keys in insertion order; indexed containers
    /// yield ascending indices; leaves yield nothing.
    pub fn child_keys(&self) -> Vec<PathSegment> {
        match &*self.value() {
            Value::Object(fields) => fields
                .keys()
                .map(|key| PathSegment::Key(key.clone()))
                .collect(),
            Value::Array(items) => (0..items.len()).map(PathSegment::Index).collect(),
            _ => Vec::new(),
        }
    }

    /// Inserts a child under a map key. Has no effect on non-objects.
    ///
    /// Inserting a handle that is already an ancestor of this node creates a
    /// circular structure; the scan engine reports such nodes via
    /// `MatchEvent::is_circular`.
    pub fn insert(&self, key: impl Into<String>, child: Node) {
        if let Value::Object(fields) = &mut *self.value_mut() {
            fields.insert(key.into(), child);
        }
    }

    /// Appends a child to an array node. Has no effect on non-arrays.
    pub fn push(&self, child: Node) {
        if let Value::Array(items) = &mut *self.value_mut() {
            items.push(child);
        }
    }
}

impl PartialEq for Node {
    /// Deep value equality. Compares values, not handle identity; use
    /// [`Node::ptr_eq`] for identity. Not defined for circular structures.
    fn eq(&self, other: &Node) -> bool {
        self.ptr_eq(other) || *self.value() == *other.value()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.value())
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::new(value)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        let converted = match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(flag) => Value::Boolean(flag),
            serde_json::Value::Number(num) => Value::Number(num.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Node::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, field)| (key, Node::from(field)))
                    .collect(),
            ),
        };
        Node::new(converted)
    }
}
