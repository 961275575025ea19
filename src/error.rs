use miette::Diagnostic;
use thiserror::Error;

/// Which lifecycle hook a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    Pre,
    Post,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::Pre => write!(f, "pre-mapping"),
            HookStage::Post => write!(f, "post-mapping"),
        }
    }
}

/// One problem found during a mapping pass.
///
/// Problems accumulate over the whole pass regardless of handling mode;
/// the mode only decides whether they raise, vanish, or land in a report.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum Problem {
    #[error("required key `{path}` is missing from the source table")]
    #[diagnostic(
        code(mapping::missing_required),
        help("Add the key to the document, or drop the `required` marker from the field registration.")
    )]
    MissingRequired { path: String },

    #[error("`{path}`: expected {expected}, found {found}")]
    #[diagnostic(
        code(mapping::type_mismatch),
        help("The node kind in the document is incompatible with the field's declared type.")
    )]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("key `{path}` was not matched by any registered field")]
    #[diagnostic(
        code(mapping::consistency),
        help("Remove the key from the document, register a field for it, or disable strict consistency.")
    )]
    Consistency { path: String },

    #[error("converter failed at `{path}`: {cause}")]
    #[diagnostic(code(mapping::converter))]
    Converter { path: String, cause: String },

    #[error("{stage} hook failed for `{type_name}`: {cause}")]
    #[diagnostic(code(mapping::hook))]
    Hook {
        stage: HookStage,
        type_name: &'static str,
        cause: String,
    },
}

impl Problem {
    /// Consistency problems are errors only when strict consistency is
    /// requested; everything else is always an error.
    pub(crate) fn is_error(&self, strict_consistency: bool) -> bool {
        match self {
            Problem::Consistency { .. } => strict_consistency,
            _ => true,
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum MapperError {
    #[error("mapping failed with {} problem(s)", .problems.len())]
    #[diagnostic(
        code(mapping::aggregate),
        help("Every problem found in the pass is listed; fix them in one go rather than one retry at a time.")
    )]
    Mapping {
        #[related]
        problems: Vec<Problem>,
    },
}

impl MapperError {
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        match self {
            MapperError::Mapping { problems } => problems,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("cannot derive a unique class name for `{name}` (from key `{key}`)")]
    #[diagnostic(
        code(generate::name_collision),
        help("Qualification by enclosing class names was exhausted; rename one of the colliding keys.")
    )]
    NameCollision { name: String, key: String },
}

/// The accumulated record of non-fatal mapping problems, returned by
/// `from_table_with_report` under `Handling::Record`.
///
/// Lists keep the order problems were found in, which follows resolver
/// order for fields and insertion order for unmatched keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingReport {
    pub missing_required: Vec<String>,
    pub unmatched: Vec<String>,
    /// (path, detail) pairs, detail phrased as "expected X, found Y".
    pub type_mismatches: Vec<(String, String)>,
    /// (path, cause) pairs.
    pub converter_failures: Vec<(String, String)>,
    /// (stage and type, cause) pairs.
    pub hook_failures: Vec<(String, String)>,
}

impl MappingReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing_required.is_empty()
            && self.unmatched.is_empty()
            && self.type_mismatches.is_empty()
            && self.converter_failures.is_empty()
            && self.hook_failures.is_empty()
    }

    pub(crate) fn from_problems(problems: &[Problem]) -> Self {
        let mut report = MappingReport::default();
        for problem in problems {
            match problem {
                Problem::MissingRequired { path } => report.missing_required.push(path.clone()),
                Problem::Consistency { path } => report.unmatched.push(path.clone()),
                Problem::TypeMismatch {
                    path,
                    expected,
                    found,
                } => report
                    .type_mismatches
                    .push((path.clone(), format!("expected {expected}, found {found}"))),
                Problem::Converter { path, cause } => report
                    .converter_failures
                    .push((path.clone(), cause.clone())),
                Problem::Hook {
                    stage,
                    type_name,
                    cause,
                } => report
                    .hook_failures
                    .push((format!("{stage} on {type_name}"), cause.clone())),
            }
        }
        report
    }
}
