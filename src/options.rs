/// What the mapping engine does with problems found during a pass.
///
/// Every mode walks the entire tree; the mode only decides how the
/// accumulated problems surface at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handling {
    /// Raise one aggregate error enumerating every problem found in the pass.
    #[default]
    Throw,
    /// Skip offending fields, leaving them at their default value.
    Ignore,
    /// Complete the pass and return a full `MappingReport`; never raises.
    Record,
}

/// Configuration for `from_table`/`to_table`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapperOptions {
    /// Derive source key names by collapsing word separators out of member
    /// names into canonical capitalization (`max_retries` -> `MaxRetries`).
    pub remove_key_word_separator: bool,
    /// Separator characters recognized by `remove_key_word_separator`.
    pub key_word_separators: Vec<char>,
    /// Match table keys to field names ignoring ASCII case.
    pub property_name_case_insensitive: bool,
    /// Include fields registered with `Field::static_value`, read and
    /// written against the type rather than an instance.
    pub allow_static_property: bool,
    pub handling: Handling,
    /// Treat table keys unmatched by any registered field as errors instead
    /// of report-only information.
    pub strict_consistency: bool,
}

impl Default for MapperOptions {
    fn default() -> Self {
        MapperOptions {
            remove_key_word_separator: false,
            key_word_separators: vec!['_'],
            property_name_case_insensitive: false,
            allow_static_property: false,
            handling: Handling::Throw,
            strict_consistency: false,
        }
    }
}

impl MapperOptions {
    /// The subset of options that changes what the resolver produces.
    /// Matching behavior (case-insensitivity, statics, handling) is applied
    /// at walk time and deliberately left out of the cache key.
    pub(crate) fn resolution_key(&self) -> ResolutionKey {
        ResolutionKey {
            remove_key_word_separator: self.remove_key_word_separator,
            key_word_separators: self.key_word_separators.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ResolutionKey {
    remove_key_word_separator: bool,
    key_word_separators: Vec<char>,
}

/// Configuration for `generate_schema`/`emit`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Copy path-keyed comments from the supplied `CommentSet` onto
    /// generated classes and values.
    pub add_comment: bool,
    /// Declare the two comment-carrying members on every non-anonymous
    /// class and implement `TableComment` for it, so comments attached to
    /// instances can round-trip through later serialization.
    pub add_class_comment_interface: bool,
    /// Attach explicit order markers matching encounter order.
    pub add_property_order_attribute: bool,
    /// Attach a name-override marker to every value, not only those whose
    /// identifier had to diverge from the source key.
    pub add_property_name_attribute: bool,
    /// Collapse word separators out of keys when deriving identifiers.
    pub remove_key_word_separator: bool,
    pub key_word_separators: Vec<char>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            add_comment: false,
            add_class_comment_interface: false,
            add_property_order_attribute: false,
            add_property_name_attribute: false,
            remove_key_word_separator: false,
            key_word_separators: vec!['_'],
        }
    }
}
