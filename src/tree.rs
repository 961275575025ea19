use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

/// One value in a document tree: a scalar, an array, or a table.
///
/// The tree is acyclic and finite by construction: a `Node` owns its
/// children outright, so no sharing or back-edges are representable.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    OffsetDateTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
    Array(Vec<Node>),
    Table(Table),
}

impl Node {
    /// A stable, human-readable tag for the node's kind, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Integer(_) => "integer",
            Node::Float(_) => "float",
            Node::Boolean(_) => "boolean",
            Node::String(_) => "string",
            Node::OffsetDateTime(_) => "offset date-time",
            Node::LocalDateTime(_) => "local date-time",
            Node::LocalDate(_) => "local date",
            Node::LocalTime(_) => "local time",
            Node::Array(_) => "array",
            Node::Table(_) => "table",
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Node::Integer(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Node::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Node::Table(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            Node::OffsetDateTime(_)
                | Node::LocalDateTime(_)
                | Node::LocalDate(_)
                | Node::LocalTime(_)
        )
    }
}

impl From<i64> for Node {
    fn from(v: i64) -> Self {
        Node::Integer(v)
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Float(v)
    }
}

impl From<bool> for Node {
    fn from(v: bool) -> Self {
        Node::Boolean(v)
    }
}

impl From<&str> for Node {
    fn from(v: &str) -> Self {
        Node::String(v.to_string())
    }
}

impl From<String> for Node {
    fn from(v: String) -> Self {
        Node::String(v)
    }
}

impl From<Vec<Node>> for Node {
    fn from(v: Vec<Node>) -> Self {
        Node::Array(v)
    }
}

impl From<Table> for Node {
    fn from(v: Table) -> Self {
        Node::Table(v)
    }
}

/// An insertion-ordered mapping of unique string keys to nodes.
///
/// Iteration order is the order keys were first inserted, which downstream
/// consumers (the mapping engine, the generator, text rendering) treat as
/// significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    entries: IndexMap<String, Node>,
}

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key/node pair. Re-inserting an existing key replaces the
    /// value but keeps the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &Node)> {
        self.entries.get_key_value(key).map(|(k, v)| (k.as_str(), v))
    }

    /// Case-insensitive lookup. An exact match wins over a case-variant one;
    /// among case variants the first in insertion order is returned. The
    /// stored key is handed back so callers can track what actually matched.
    #[must_use]
    pub fn get_ignore_case(&self, key: &str) -> Option<(&str, &Node)> {
        if let Some(hit) = self.get_key_value(key) {
            return Some(hit);
        }
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Exports the table as a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&crate::serialization::table_to_value(self))
    }

    /// Exports the table as a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&crate::serialization::table_to_value(self))
    }
}

impl FromIterator<(String, Node)> for Table {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Table {
            entries: iter.into_iter().collect(),
        }
    }
}
