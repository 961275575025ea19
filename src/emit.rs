use std::collections::BTreeSet;

use crate::generate::{Attr, ClassSchema, SchemaSet, ValueKind};

/// Renders a schema set as Rust source: each class as a struct plus the
/// `TableMapped` registration that carries its name overrides, orders, and
/// comments, so the emitted text is directly consumable by the engine.
///
/// Deterministic: identical schema sets render byte-identical text. All
/// ordering is inherited from the schema, which inherits it from table
/// insertion order; nothing here iterates an unordered container.
pub(crate) fn render(schema: &SchemaSet) -> String {
    let mut out = String::new();
    render_header(&mut out, schema);
    for class in &schema.classes {
        render_class(&mut out, class);
    }
    out
}

fn tokens(type_name: &str) -> impl Iterator<Item = &str> {
    type_name
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
}

fn render_header(out: &mut String, schema: &SchemaSet) {
    let mut chrono_names: BTreeSet<&str> = BTreeSet::new();
    let mut needs_node = false;
    let mut needs_interface = false;
    for class in &schema.classes {
        if class.attributes.contains(&Attr::CommentInterface) {
            needs_interface = true;
        }
        for value in &class.values {
            for token in tokens(&value.type_name) {
                match token {
                    "DateTime" | "FixedOffset" => {
                        chrono_names.insert("DateTime");
                        chrono_names.insert("FixedOffset");
                    }
                    "NaiveDateTime" | "NaiveDate" | "NaiveTime" => {
                        chrono_names.insert(token);
                    }
                    "Node" => needs_node = true,
                    _ => {}
                }
            }
        }
    }

    out.push_str(
        "// Generated by tomap-core schema inference; regenerate from the source\n\
         // document rather than editing by hand.\n\n",
    );
    if !chrono_names.is_empty() {
        let list = chrono_names.iter().copied().collect::<Vec<_>>().join(", ");
        out.push_str(&format!("use chrono::{{{list}}};\n"));
    }
    if needs_interface {
        out.push_str("use indexmap::IndexMap;\n");
    }
    let mut descriptor_items = vec!["Field", "Layout"];
    if needs_interface {
        descriptor_items.push("TableComment");
    }
    descriptor_items.push("TableMapped");
    out.push_str(&format!(
        "use tomap_core::descriptor::{{{}}};\n",
        descriptor_items.join(", ")
    ));
    if needs_node {
        out.push_str("use tomap_core::tree::Node;\n");
    }
}

fn render_class(out: &mut String, class: &ClassSchema) {
    let interface = class.attributes.contains(&Attr::CommentInterface);

    out.push('\n');
    if !class.anonymous {
        if let Some(comment) = &class.comment {
            for line in comment.lines() {
                out.push_str(&format!("/// {line}\n"));
            }
        }
    }
    out.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
    out.push_str(&format!("pub struct {} {{\n", class.name));
    for value in &class.values {
        if !class.anonymous {
            if let Some(comment) = &value.comment {
                for line in comment.lines() {
                    out.push_str(&format!("    /// {line}\n"));
                }
            }
        }
        out.push_str(&format!("    pub {}: {},\n", value.name, value.type_name));
    }
    if interface {
        out.push_str("    pub class_comment: String,\n");
        out.push_str("    pub value_comments: IndexMap<String, String>,\n");
    }
    out.push_str("}\n\n");

    out.push_str(&format!("impl TableMapped for {} {{\n", class.name));
    out.push_str("    fn layout() -> Layout<Self> {\n");
    out.push_str("        Layout::new()\n");
    for value in &class.values {
        let constructor = match value.kind {
            ValueKind::Value => "value",
            ValueKind::Nested => "nested",
            ValueKind::NestedSeq => "nested_seq",
        };
        let mut line = format!(
            "            .with(Field::{constructor}({:?}, |v: &{}| v.{}.clone(), |v, x| v.{} = x)",
            value.name, class.name, value.name, value.name
        );
        for attr in &value.attributes {
            match attr {
                Attr::Name(key) => line.push_str(&format!(".renamed({key:?})")),
                Attr::Order(n) => line.push_str(&format!(".order({n})")),
                Attr::CommentInterface => {}
            }
        }
        if !class.anonymous {
            if let Some(comment) = &value.comment {
                line.push_str(&format!(".comment({comment:?})"));
            }
        }
        line.push_str(")\n");
        out.push_str(&line);
    }
    out.push_str("    }\n}\n");

    if interface {
        out.push('\n');
        out.push_str(&format!("impl TableComment for {} {{\n", class.name));
        out.push_str(
            "    fn class_comment(&mut self) -> &mut String {\n        &mut self.class_comment\n    }\n\n",
        );
        out.push_str(
            "    fn value_comments(&mut self) -> &mut IndexMap<String, String> {\n        &mut self.value_comments\n    }\n}\n",
        );
    }
}
