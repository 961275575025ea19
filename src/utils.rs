/// Collapses word separators out of a member name into canonical
/// capitalization: `max_retries` with separator `_` becomes `MaxRetries`.
/// Used by the resolver to derive source key names when
/// `remove_key_word_separator` is enabled.
pub(crate) fn collapse_separators(name: &str, separators: &[char]) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(|c| separators.contains(&c)) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Derives a type-name identifier from a source key: separator words are
/// collapsed into PascalCase, illegal characters dropped, and a leading
/// digit guarded with an underscore.
pub(crate) fn type_ident(key: &str, separators: &[char]) -> String {
    let pascal = collapse_separators(key, separators);
    let mut out: String = pascal
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if out.is_empty() {
        out.push_str("Unnamed");
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Derives a legal field identifier from a source key. When `remove_separator`
/// is set the key's separator words are re-joined with `_`; reserved words
/// get a trailing underscore, everything else is sanitized in place.
pub(crate) fn field_ident(key: &str, remove_separator: bool, separators: &[char]) -> String {
    let base = if remove_separator {
        key.split(|c| separators.contains(&c))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join("_")
    } else {
        key.to_string()
    };
    let mut out: String = base
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        out.push('_');
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if is_rust_keyword(&out) {
        out.push('_');
    }
    out
}

pub(crate) fn is_rust_keyword(word: &str) -> bool {
    matches!(
        word,
        "as" | "async" | "await" | "break" | "const" | "continue" | "crate" | "dyn" | "else"
            | "enum" | "extern" | "false" | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop"
            | "match" | "mod" | "move" | "mut" | "pub" | "ref" | "return" | "self" | "Self"
            | "static" | "struct" | "super" | "trait" | "true" | "type" | "unsafe" | "use"
            | "where" | "while" | "abstract" | "become" | "box" | "do" | "final" | "macro"
            | "override" | "priv" | "try" | "typeof" | "unsized" | "virtual" | "yield"
    )
}
