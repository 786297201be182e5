//! Builder for JSON request bodies.
//!
//! Endpoint wrappers assemble their request bodies with a small tree builder
//! instead of ad-hoc literals:
//!
//! ```
//! use lclpnetwork_client::json::object;
//!
//! let body = object()
//!     .set("uuid", "7357a549-fa3e-4342-91b2-63e5e73ed39a")
//!     .begin_array("modules")
//!     .add("general")
//!     .end_array()
//!     .create_object();
//! assert_eq!(body["modules"][0], "general");
//! ```
//!
//! `begin_*` methods return a child builder; the matching `end_*` attaches the
//! finished subtree to the parent and returns it. Structural misuse (ending
//! the root, keyed inserts into an array) is a programming error and panics,
//! like the original builder this mirrors.

use serde_json::{Map, Value};

/// Start building a JSON object.
pub fn object() -> JsonBuilder {
    JsonBuilder::root(Node::object())
}

/// Start building a JSON array.
pub fn array() -> JsonBuilder {
    JsonBuilder::root(Node::array())
}

#[derive(Debug)]
enum Node {
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl Node {
    fn object() -> Self {
        Self::Object(Map::new())
    }

    fn array() -> Self {
        Self::Array(Vec::new())
    }

    fn finish(self) -> Value {
        match self {
            Self::Object(map) => Value::Object(map),
            Self::Array(items) => Value::Array(items),
        }
    }
}

/// A builder producing [`serde_json::Value`] trees.
///
/// Created through [`object()`] or [`array()`].
#[derive(Debug)]
pub struct JsonBuilder {
    node: Node,
    // Set on child builders: the parent plus the key the finished subtree
    // will be stored under (None when the parent is an array).
    parent: Option<(Box<JsonBuilder>, Option<String>)>,
}

impl JsonBuilder {
    fn root(node: Node) -> Self {
        Self { node, parent: None }
    }

    /// Set a property on the current object.
    ///
    /// # Panics
    ///
    /// Panics when called on an array builder.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self.node {
            Node::Object(map) => {
                map.insert(key.into(), value.into());
            }
            Node::Array(_) => panic!("set() is only valid on object builders"),
        }
        self
    }

    /// Append an element to the current array.
    ///
    /// # Panics
    ///
    /// Panics when called on an object builder.
    pub fn add(mut self, value: impl Into<Value>) -> Self {
        match &mut self.node {
            Node::Array(items) => items.push(value.into()),
            Node::Object(_) => panic!("add() is only valid on array builders"),
        }
        self
    }

    /// Append every element of an iterator to the current array.
    ///
    /// # Panics
    ///
    /// Panics when called on an object builder.
    pub fn add_all<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        for value in values {
            self = self.add(value);
        }
        self
    }

    /// Begin a nested object stored under `key` in the current object.
    ///
    /// # Panics
    ///
    /// Panics when called on an array builder.
    pub fn begin_object(self, key: impl Into<String>) -> Self {
        self.begin(Some(key.into()), Node::object())
    }

    /// Begin a nested object appended to the current array.
    ///
    /// # Panics
    ///
    /// Panics when called on an object builder.
    pub fn begin_object_element(self) -> Self {
        self.begin(None, Node::object())
    }

    /// Begin a nested array stored under `key` in the current object.
    ///
    /// # Panics
    ///
    /// Panics when called on an array builder.
    pub fn begin_array(self, key: impl Into<String>) -> Self {
        self.begin(Some(key.into()), Node::array())
    }

    /// Begin a nested array appended to the current array.
    ///
    /// # Panics
    ///
    /// Panics when called on an object builder.
    pub fn begin_array_element(self) -> Self {
        self.begin(None, Node::array())
    }

    fn begin(self, key: Option<String>, child: Node) -> Self {
        match (&self.node, &key) {
            (Node::Object(_), None) => panic!("a key is required on object builders"),
            (Node::Array(_), Some(_)) => panic!("keys are not allowed on array builders"),
            _ => {}
        }
        Self { node: child, parent: Some((Box::new(self), key)) }
    }

    /// End the current nested object and return its parent builder.
    ///
    /// # Panics
    ///
    /// Panics on the root builder or inside an array child.
    pub fn end_object(self) -> Self {
        assert!(
            matches!(self.node, Node::Object(_)),
            "end_object() called on an array builder"
        );
        self.end()
    }

    /// End the current nested array and return its parent builder.
    ///
    /// # Panics
    ///
    /// Panics on the root builder or inside an object child.
    pub fn end_array(self) -> Self {
        assert!(
            matches!(self.node, Node::Array(_)),
            "end_array() called on an object builder"
        );
        self.end()
    }

    fn end(self) -> Self {
        let Some((parent, key)) = self.parent else {
            panic!("end may only be called on child builders")
        };
        let finished = self.node.finish();
        match key {
            Some(key) => parent.set(key, finished),
            None => parent.add(finished),
        }
    }

    /// Finish the root object builder.
    ///
    /// # Panics
    ///
    /// Panics on array builders or unfinished child builders.
    pub fn create_object(self) -> Value {
        assert!(self.parent.is_none(), "unfinished child builder; call end_object()/end_array()");
        assert!(
            matches!(self.node, Node::Object(_)),
            "create_object() called on an array builder"
        );
        self.node.finish()
    }

    /// Finish the root array builder.
    ///
    /// # Panics
    ///
    /// Panics on object builders or unfinished child builders.
    pub fn create_array(self) -> Value {
        assert!(self.parent.is_none(), "unfinished child builder; call end_object()/end_array()");
        assert!(
            matches!(self.node, Node::Array(_)),
            "create_array() called on an object builder"
        );
        self.node.finish()
    }
}
