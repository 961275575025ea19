use indexmap::IndexMap;
use serde::Serialize;

use crate::tree::{Node, Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

pub(crate) fn to_value(node: &Node) -> Value {
    match node {
        Node::Integer(v) => Value::Integer(*v),
        Node::Float(v) => Value::Float(*v),
        Node::Boolean(v) => Value::Boolean(*v),
        Node::String(v) => Value::String(v.clone()),
        // Datetimes export as their canonical text renderings.
        Node::OffsetDateTime(v) => Value::String(v.to_rfc3339()),
        Node::LocalDateTime(v) => Value::String(v.to_string()),
        Node::LocalDate(v) => Value::String(v.to_string()),
        Node::LocalTime(v) => Value::String(v.to_string()),
        Node::Array(items) => Value::Array(items.iter().map(to_value).collect()),
        Node::Table(table) => table_to_value(table),
    }
}

pub(crate) fn table_to_value(table: &Table) -> Value {
    let mut map = IndexMap::with_capacity(table.len());
    for (key, node) in table.iter() {
        map.insert(key.to_string(), to_value(node));
    }
    Value::Object(map)
}
