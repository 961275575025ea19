pub mod api;
pub mod convert;
pub mod descriptor;
mod emit;
pub mod error;
pub mod generate;
mod mapping;
pub mod options;
pub mod resolver;
mod serialization;
pub mod tree;
mod utils;

pub use api::{emit, from_table, from_table_with_report, generate_schema, generate_source, to_table};
pub use descriptor::{Field, FieldDescriptor, Layout, Symbolic, TableComment, TableMapped};
pub use error::{GeneratorError, MapperError, MappingReport, Problem};
pub use generate::{ClassSchema, CommentSet, SchemaSet, ValueSchema};
pub use options::{GeneratorOptions, Handling, MapperOptions};
pub use tree::{Node, Table};
