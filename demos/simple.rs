use tomap_core::descriptor::{Field, Layout, TableMapped};
use tomap_core::{from_table, generate_source, CommentSet, GeneratorOptions, MapperOptions, Table};

#[derive(Debug, Clone, Default, PartialEq)]
struct User {
    name: String,
    email: String,
}

impl TableMapped for User {
    fn layout() -> Layout<Self> {
        Layout::new()
            .with(Field::value(
                "name",
                |u: &User| u.name.clone(),
                |u, v| u.name = v,
            ))
            .with(Field::value(
                "email",
                |u: &User| u.email.clone(),
                |u, v| u.email = v,
            ))
    }
}

fn main() {
    let mut document = Table::new();
    document.insert("name", "John Doe");
    document.insert("email", "john.doe@example.com");

    match from_table::<User>(&document, &MapperOptions::default()) {
        Ok(user) => {
            println!("Mapped user: {user:?}");
        }
        Err(e) => {
            eprintln!("Failed to map document: {e:?}");
        }
    }

    match generate_source(
        &document,
        "User",
        &CommentSet::new(),
        &GeneratorOptions::default(),
    ) {
        Ok(source) => {
            println!("\nInferred schema:\n{source}");
        }
        Err(e) => {
            eprintln!("Failed to infer a schema: {e:?}");
        }
    }
}
