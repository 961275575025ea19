use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;

use crate::error::{HookStage, Problem};
use crate::options::MapperOptions;
use crate::tree::{Node, Table};

/// Shared state threaded through one mapping pass: the options chosen at
/// the top of the call, the problem sink, and the current path.
///
/// The same environment instance travels through every recursive step, so
/// nested tables and array elements always see the mode and options the
/// caller started with.
pub struct MapEnv<'a> {
    options: &'a MapperOptions,
    problems: &'a mut Vec<Problem>,
    path: Vec<String>,
}

impl<'a> MapEnv<'a> {
    pub(crate) fn new(options: &'a MapperOptions, problems: &'a mut Vec<Problem>) -> Self {
        MapEnv {
            options,
            problems,
            path: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &MapperOptions {
        self.options
    }

    /// Pushes a path segment. Segments starting with `[` are rendered as
    /// index suffixes (`servers[2]`), everything else is dot-joined.
    pub fn enter(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    #[must_use]
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            if !out.is_empty() && !segment.starts_with('[') {
                out.push('.');
            }
            out.push_str(segment);
        }
        out
    }

    /// Records a type mismatch at the current path.
    pub fn mismatch(&mut self, expected: impl Into<String>, node: &Node) {
        self.problems.push(Problem::TypeMismatch {
            path: self.path_string(),
            expected: expected.into(),
            found: node.kind_name().to_string(),
        });
    }

    /// Records a converter failure at the current path.
    pub fn converter_failure(&mut self, cause: impl Into<String>) {
        self.problems.push(Problem::Converter {
            path: self.path_string(),
            cause: cause.into(),
        });
    }

    pub(crate) fn missing_required(&mut self) {
        self.problems.push(Problem::MissingRequired {
            path: self.path_string(),
        });
    }

    pub(crate) fn unmatched(&mut self) {
        self.problems.push(Problem::Consistency {
            path: self.path_string(),
        });
    }

    pub(crate) fn hook_failure(&mut self, stage: HookStage, type_name: &'static str, cause: String) {
        self.problems.push(Problem::Hook {
            stage,
            type_name,
            cause,
        });
    }
}

/// Conversion from a document node into a value.
///
/// Returning `None` means the conversion failed; the implementation has
/// already recorded the problem in the environment and the engine leaves
/// the target field at its default value.
pub trait FromNode: Sized {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self>;
}

/// Conversion from a value into a document node.
///
/// `None` means "omit this entry entirely", which is how optional-and-absent
/// values keep round-trips lossless.
pub trait ToNode {
    fn to_node(&self) -> Option<Node>;
}

impl FromNode for i64 {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::Integer(v) => Some(*v),
            other => {
                env.mismatch("integer", other);
                None
            }
        }
    }
}

impl FromNode for i32 {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::Integer(v) => match i32::try_from(*v) {
                Ok(narrow) => Some(narrow),
                Err(_) => {
                    env.mismatch("integer in 32-bit range", node);
                    None
                }
            },
            other => {
                env.mismatch("integer", other);
                None
            }
        }
    }
}

impl FromNode for f64 {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::Float(v) => Some(*v),
            // The one deliberate widening: integer literals are accepted
            // where a float is declared.
            Node::Integer(v) => Some(*v as f64),
            other => {
                env.mismatch("float", other);
                None
            }
        }
    }
}

impl FromNode for bool {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::Boolean(v) => Some(*v),
            other => {
                env.mismatch("boolean", other);
                None
            }
        }
    }
}

impl FromNode for String {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::String(v) => Some(v.clone()),
            other => {
                env.mismatch("string", other);
                None
            }
        }
    }
}

impl FromNode for DateTime<FixedOffset> {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::OffsetDateTime(v) => Some(*v),
            other => {
                env.mismatch("offset date-time", other);
                None
            }
        }
    }
}

impl FromNode for NaiveDateTime {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::LocalDateTime(v) => Some(*v),
            other => {
                env.mismatch("local date-time", other);
                None
            }
        }
    }
}

impl FromNode for NaiveDate {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::LocalDate(v) => Some(*v),
            other => {
                env.mismatch("local date", other);
                None
            }
        }
    }
}

impl FromNode for NaiveTime {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::LocalTime(v) => Some(*v),
            other => {
                env.mismatch("local time", other);
                None
            }
        }
    }
}

impl FromNode for Node {
    fn from_node(node: &Node, _env: &mut MapEnv<'_>) -> Option<Self> {
        Some(node.clone())
    }
}

impl FromNode for Table {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::Table(v) => Some(v.clone()),
            other => {
                env.mismatch("table", other);
                None
            }
        }
    }
}

impl<V: FromNode> FromNode for Vec<V> {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    env.enter(format!("[{i}]"));
                    if let Some(v) = V::from_node(item, env) {
                        out.push(v);
                    }
                    env.leave();
                }
                Some(out)
            }
            other => {
                env.mismatch("array", other);
                None
            }
        }
    }
}

impl<V: FromNode> FromNode for Option<V> {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        V::from_node(node, env).map(Some)
    }
}

impl<V: FromNode> FromNode for IndexMap<String, V> {
    fn from_node(node: &Node, env: &mut MapEnv<'_>) -> Option<Self> {
        match node {
            Node::Table(table) => {
                let mut out = IndexMap::with_capacity(table.len());
                for (key, value) in table.iter() {
                    env.enter(key);
                    if let Some(v) = V::from_node(value, env) {
                        out.insert(key.to_string(), v);
                    }
                    env.leave();
                }
                Some(out)
            }
            other => {
                env.mismatch("table", other);
                None
            }
        }
    }
}

impl ToNode for i64 {
    fn to_node(&self) -> Option<Node> {
        Some(Node::Integer(*self))
    }
}

impl ToNode for i32 {
    fn to_node(&self) -> Option<Node> {
        Some(Node::Integer(i64::from(*self)))
    }
}

impl ToNode for f64 {
    fn to_node(&self) -> Option<Node> {
        Some(Node::Float(*self))
    }
}

impl ToNode for bool {
    fn to_node(&self) -> Option<Node> {
        Some(Node::Boolean(*self))
    }
}

impl ToNode for String {
    fn to_node(&self) -> Option<Node> {
        Some(Node::String(self.clone()))
    }
}

impl ToNode for DateTime<FixedOffset> {
    fn to_node(&self) -> Option<Node> {
        Some(Node::OffsetDateTime(*self))
    }
}

impl ToNode for NaiveDateTime {
    fn to_node(&self) -> Option<Node> {
        Some(Node::LocalDateTime(*self))
    }
}

impl ToNode for NaiveDate {
    fn to_node(&self) -> Option<Node> {
        Some(Node::LocalDate(*self))
    }
}

impl ToNode for NaiveTime {
    fn to_node(&self) -> Option<Node> {
        Some(Node::LocalTime(*self))
    }
}

impl ToNode for Node {
    fn to_node(&self) -> Option<Node> {
        Some(self.clone())
    }
}

impl ToNode for Table {
    fn to_node(&self) -> Option<Node> {
        Some(Node::Table(self.clone()))
    }
}

impl<V: ToNode> ToNode for Vec<V> {
    fn to_node(&self) -> Option<Node> {
        Some(Node::Array(self.iter().filter_map(ToNode::to_node).collect()))
    }
}

impl<V: ToNode> ToNode for Option<V> {
    fn to_node(&self) -> Option<Node> {
        self.as_ref().and_then(ToNode::to_node)
    }
}

impl<V: ToNode> ToNode for IndexMap<String, V> {
    fn to_node(&self) -> Option<Node> {
        let mut table = Table::new();
        for (key, value) in self {
            if let Some(node) = value.to_node() {
                table.insert(key.clone(), node);
            }
        }
        Some(Node::Table(table))
    }
}
