use std::collections::{HashMap, HashSet};

use crate::error::GeneratorError;
use crate::options::GeneratorOptions;
use crate::tree::{Node, Table};
use crate::utils;

/// Comments supplied alongside a parsed tree, keyed by dotted data path.
/// The empty path addresses the root table; `"database.server"` addresses
/// the `server` key inside the `database` table.
#[derive(Debug, Clone, Default)]
pub struct CommentSet {
    by_path: HashMap<String, String>,
}

impl CommentSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.by_path.insert(path.into(), text.into());
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }
}

/// A declaration marker attached to a generated class or value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    /// Name override targeting the original source key.
    Name(String),
    /// Explicit order matching encounter position.
    Order(usize),
    /// The class carries the two comment members and a `TableComment` impl.
    CommentInterface,
}

/// How a generated value maps back through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Structural conversion: scalars, `Vec` of scalars, raw nodes.
    Value,
    /// A nested generated class.
    Nested,
    /// An array of a nested generated class.
    NestedSeq,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSchema {
    /// Emitted identifier.
    pub name: String,
    /// Original source key.
    pub key: String,
    pub type_name: String,
    pub kind: ValueKind,
    pub comment: Option<String>,
    pub attributes: Vec<Attr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSchema {
    pub name: String,
    /// Dotted data path of the table this class was derived from; empty for
    /// the root.
    pub full_key: String,
    pub parent: Option<String>,
    pub anonymous: bool,
    pub comment: Option<String>,
    pub values: Vec<ValueSchema>,
    pub attributes: Vec<Attr>,
}

/// Classes in depth-first first-encountered order, root first. Transient:
/// built fresh per `generate_schema` call and discarded after emission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    pub classes: Vec<ClassSchema>,
}

pub(crate) fn generate(
    root: &Table,
    root_name: &str,
    comments: &CommentSet,
    options: &GeneratorOptions,
) -> Result<SchemaSet, GeneratorError> {
    let mut generator = Generator {
        options,
        comments,
        taken: seed_taken(),
        classes: Vec::new(),
    };
    generator.build_class(root, root_name, "", &[], false)?;
    Ok(SchemaSet {
        classes: generator.classes,
    })
}

struct Generator<'a> {
    options: &'a GeneratorOptions,
    comments: &'a CommentSet,
    /// Lowercased names already claimed, seeded with type names the emitted
    /// source brings into scope so a key like `string` cannot shadow them.
    taken: HashSet<String>,
    classes: Vec<ClassSchema>,
}

fn seed_taken() -> HashSet<String> {
    [
        "string",
        "node",
        "table",
        "option",
        "vec",
        "box",
        "self",
        "indexmap",
        "layout",
        "field",
        "tablemapped",
        "tablecomment",
        "datetime",
        "fixedoffset",
        "naivedatetime",
        "naivedate",
        "naivetime",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Generator<'_> {
    fn build_class(
        &mut self,
        table: &Table,
        key: &str,
        path: &str,
        ancestors: &[String],
        anonymous: bool,
    ) -> Result<String, GeneratorError> {
        let base = utils::type_ident(key, &self.options.key_word_separators);
        let name = self.claim_name(&base, ancestors, key)?;

        let class_index = self.classes.len();
        self.classes.push(ClassSchema {
            name: name.clone(),
            full_key: path.to_string(),
            parent: ancestors.last().cloned(),
            anonymous,
            comment: if self.options.add_comment && !anonymous {
                self.comments.get(path).map(str::to_string)
            } else {
                None
            },
            values: Vec::new(),
            attributes: if self.options.add_class_comment_interface && !anonymous {
                vec![Attr::CommentInterface]
            } else {
                Vec::new()
            },
        });

        let mut chain = ancestors.to_vec();
        chain.push(name.clone());

        let mut values = Vec::new();
        let mut used_idents: HashSet<String> = HashSet::new();
        for (position, (child_key, node)) in table.iter().enumerate() {
            let child_path = if path.is_empty() {
                child_key.to_string()
            } else {
                format!("{path}.{child_key}")
            };
            let (type_name, kind) = self.value_type(node, child_key, &child_path, &chain)?;

            let base_ident = utils::field_ident(
                child_key,
                self.options.remove_key_word_separator,
                &self.options.key_word_separators,
            );
            let mut ident = base_ident.clone();
            let mut suffix = 1;
            while used_idents.contains(&ident) {
                suffix += 1;
                ident = format!("{base_ident}_{suffix}");
            }
            used_idents.insert(ident.clone());

            let mut attributes = Vec::new();
            if self.options.add_property_name_attribute || ident != *child_key {
                attributes.push(Attr::Name(child_key.to_string()));
            }
            if self.options.add_property_order_attribute {
                attributes.push(Attr::Order(position));
            }

            values.push(ValueSchema {
                name: ident,
                key: child_key.to_string(),
                type_name,
                kind,
                comment: if self.options.add_comment {
                    self.comments.get(&child_path).map(str::to_string)
                } else {
                    None
                },
                attributes,
            });
        }
        self.classes[class_index].values = values;
        Ok(name)
    }

    fn value_type(
        &mut self,
        node: &Node,
        key: &str,
        path: &str,
        chain: &[String],
    ) -> Result<(String, ValueKind), GeneratorError> {
        match node {
            Node::Table(table) => {
                let class = self.build_class(table, key, path, chain, false)?;
                Ok((class, ValueKind::Nested))
            }
            Node::Array(items) => self.array_type(items.first(), key, path, chain),
            scalar => Ok((scalar_field_type(scalar), ValueKind::Value)),
        }
    }

    /// Arrays are typed by their first element. An array of tables derives
    /// one anonymous class from that first element and reuses it for the
    /// whole array; later elements are not structurally merged.
    fn array_type(
        &mut self,
        first: Option<&Node>,
        key: &str,
        path: &str,
        chain: &[String],
    ) -> Result<(String, ValueKind), GeneratorError> {
        match first {
            None => Ok(("Vec<Node>".to_string(), ValueKind::Value)),
            Some(Node::Table(table)) => {
                let class = self.build_class(table, key, path, chain, true)?;
                Ok((format!("Vec<{class}>"), ValueKind::NestedSeq))
            }
            Some(Node::Array(inner)) => match inner.first() {
                // Nesting deeper than one scalar level stays a raw subtree.
                Some(Node::Table(_) | Node::Array(_)) | None => {
                    Ok(("Vec<Node>".to_string(), ValueKind::Value))
                }
                Some(scalar) => Ok((
                    format!("Vec<Vec<{}>>", scalar_element_type(scalar)),
                    ValueKind::Value,
                )),
            },
            Some(scalar) => Ok((
                format!("Vec<{}>", scalar_element_type(scalar)),
                ValueKind::Value,
            )),
        }
    }

    /// Claims a globally unique class name, qualifying with enclosing class
    /// names from nearest outward on collision. Uniqueness is judged
    /// case-insensitively so `alpha` and `Alpha` cannot both emit `Alpha`.
    fn claim_name(
        &mut self,
        base: &str,
        ancestors: &[String],
        key: &str,
    ) -> Result<String, GeneratorError> {
        let mut candidate = base.to_string();
        let mut enclosing = ancestors.iter().rev();
        while self.taken.contains(&candidate.to_ascii_lowercase()) {
            match enclosing.next() {
                Some(ancestor) => candidate = format!("{ancestor}{candidate}"),
                None => {
                    return Err(GeneratorError::NameCollision {
                        name: candidate,
                        key: key.to_string(),
                    })
                }
            }
        }
        self.taken.insert(candidate.to_ascii_lowercase());
        Ok(candidate)
    }
}

fn scalar_element_type(node: &Node) -> &'static str {
    match node {
        Node::Integer(_) => "i64",
        Node::Float(_) => "f64",
        Node::Boolean(_) => "bool",
        Node::String(_) => "String",
        Node::OffsetDateTime(_) => "DateTime<FixedOffset>",
        Node::LocalDateTime(_) => "NaiveDateTime",
        Node::LocalDate(_) => "NaiveDate",
        Node::LocalTime(_) => "NaiveTime",
        Node::Array(_) | Node::Table(_) => "Node",
    }
}

fn scalar_field_type(node: &Node) -> String {
    let base = scalar_element_type(node);
    // Datetimes have no zero value for Default-based construction, so
    // top-level datetime fields are optional.
    if node.is_datetime() {
        format!("Option<{base}>")
    } else {
        base.to_string()
    }
}
