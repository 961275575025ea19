use crate::convert::MapEnv;
use crate::descriptor::TableMapped;
use crate::error::{GeneratorError, MapperError, MappingReport, Problem};
use crate::generate::{self, CommentSet, SchemaSet};
use crate::mapping;
use crate::options::{GeneratorOptions, Handling, MapperOptions};
use crate::tree::Table;

/// Reads a table into a new `T`.
///
/// The whole tree is walked regardless of handling mode; the mode decides
/// what the accumulated problems mean:
///
/// * `Throw` raises one aggregate error enumerating every problem found
///   in the pass, never just the first.
/// * `Ignore` leaves offending fields at their default value.
/// * `Record` behaves like `Ignore` here; use [`from_table_with_report`]
///   to also get the report.
///
/// # Errors
///
/// Returns a `MapperError` under `Handling::Throw` when any
/// missing-required, type-mismatch, converter, hook, or (under strict
/// consistency) unmatched-key problem was found.
pub fn from_table<T: TableMapped>(root: &Table, options: &MapperOptions) -> Result<T, MapperError> {
    let (value, problems) = decode(root, options);
    match options.handling {
        Handling::Throw => {
            let errors = error_grade(&problems, options);
            if errors.is_empty() {
                Ok(value)
            } else {
                Err(MapperError::Mapping { problems: errors })
            }
        }
        Handling::Ignore | Handling::Record => Ok(value),
    }
}

/// Reads a table into a new `T` and returns the best-effort result together
/// with the accumulated [`MappingReport`].
///
/// Under `Handling::Record` this never raises: the pass always completes
/// and every problem lands in the report. Under `Ignore` the report is
/// empty by definition. Under `Throw` the report is only returned when the
/// pass was clean of error-grade problems.
///
/// # Errors
///
/// Returns a `MapperError` only under `Handling::Throw`, carrying every
/// problem found in the pass.
pub fn from_table_with_report<T: TableMapped>(
    root: &Table,
    options: &MapperOptions,
) -> Result<(T, MappingReport), MapperError> {
    let (value, problems) = decode(root, options);
    match options.handling {
        Handling::Throw => {
            let errors = error_grade(&problems, options);
            if errors.is_empty() {
                Ok((value, MappingReport::from_problems(&problems)))
            } else {
                Err(MapperError::Mapping { problems: errors })
            }
        }
        Handling::Ignore => Ok((value, MappingReport::default())),
        Handling::Record => Ok((value, MappingReport::from_problems(&problems))),
    }
}

/// Writes `value` into a new table.
///
/// Field order in the result follows resolver order, which downstream
/// rendering treats as significant. Fields whose value encodes to nothing
/// (an unset `Option`, a converter returning `Ok(None)`) are omitted
/// entirely, keeping "optional and absent" lossless across round-trips.
///
/// # Errors
///
/// Returns a `MapperError` under `Handling::Throw` when a registered
/// converter fails to write; under the other modes the failing field is
/// omitted.
pub fn to_table<T: TableMapped>(value: &T, options: &MapperOptions) -> Result<Table, MapperError> {
    let mut problems = Vec::new();
    let table = {
        let mut env = MapEnv::new(options, &mut problems);
        mapping::encode_table(value, &mut env)
    };
    match options.handling {
        Handling::Throw if !problems.is_empty() => Err(MapperError::Mapping { problems }),
        _ => Ok(table),
    }
}

/// Derives a synthetic class schema from an example document.
///
/// One class per table, named from its key and qualified by enclosing
/// class names on collision; arrays of tables derive one anonymous class
/// from their first element. Comments come from the externally supplied
/// `comments`, keyed by dotted data path. The result is transient: two
/// calls on different trees cannot interfere.
///
/// # Errors
///
/// Returns a `GeneratorError` if a unique class name could not be derived
/// even after qualification.
pub fn generate_schema(
    root: &Table,
    root_name: &str,
    comments: &CommentSet,
    options: &GeneratorOptions,
) -> Result<SchemaSet, GeneratorError> {
    generate::generate(root, root_name, comments, options)
}

/// Renders a schema set as Rust source text: root class first, then nested
/// classes in first-encountered order. Byte-identical output for identical
/// input.
#[must_use]
pub fn emit(schema: &SchemaSet) -> String {
    crate::emit::render(schema)
}

/// Convenience composing [`generate_schema`] and [`emit`].
///
/// # Errors
///
/// Returns a `GeneratorError` if schema generation fails.
pub fn generate_source(
    root: &Table,
    root_name: &str,
    comments: &CommentSet,
    options: &GeneratorOptions,
) -> Result<String, GeneratorError> {
    Ok(emit(&generate_schema(root, root_name, comments, options)?))
}

fn decode<T: TableMapped>(root: &Table, options: &MapperOptions) -> (T, Vec<Problem>) {
    let mut problems = Vec::new();
    let value = {
        let mut env = MapEnv::new(options, &mut problems);
        mapping::decode_table::<T>(root, &mut env)
    };
    (value, problems)
}

fn error_grade(problems: &[Problem], options: &MapperOptions) -> Vec<Problem> {
    problems
        .iter()
        .filter(|p| p.is_error(options.strict_consistency))
        .cloned()
        .collect()
}
