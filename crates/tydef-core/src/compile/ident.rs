use heck::{ToLowerCamelCase, ToPascalCase};

use crate::ir::QualifiedName;
use crate::schema::RefPath;

/// Maps an arbitrary path segment into a valid type-identifier fragment.
/// Pluggable via [`crate::compile::CompileOptions`].
pub type IdentifierFn = fn(&str) -> String;

/// Default type identifier: sanitize, then PascalCase. A leading `$` is
/// preserved so synthesized status segments like `$200` stay valid.
pub fn type_identifier(segment: &str) -> String {
    let (prefix, rest) = match segment.strip_prefix('$') {
        Some(rest) => ("$", rest),
        None => ("", segment),
    };
    let sanitized = sanitize(rest);
    if sanitized.is_empty() {
        return format!("{prefix}Unnamed");
    }
    format!("{}{}", prefix, sanitized.to_pascal_case())
}

/// Member identifier: sanitize, then camelCase. Used for synthesized
/// record field names.
pub fn member_identifier(segment: &str) -> String {
    let sanitized = sanitize(segment);
    if sanitized.is_empty() {
        return "unnamed".to_string();
    }
    sanitized.to_lower_camel_case()
}

/// Build the namespace-qualified name of the declaration a path resolves
/// to, running every segment through the identifier function.
pub fn qualify(path: &RefPath, identifier: IdentifierFn) -> QualifiedName {
    QualifiedName(path.segments().iter().map(|s| identifier(s)).collect())
}

/// Collapse non-alphanumeric runs into single word breaks.
fn sanitize(segment: &str) -> String {
    let mut result = String::with_capacity(segment.len());
    let mut prev_was_separator = false;

    for (i, ch) in segment.chars().enumerate() {
        if ch.is_alphanumeric() {
            if i == 0 && ch.is_ascii_digit() {
                result.push('_');
            }
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    result
}
