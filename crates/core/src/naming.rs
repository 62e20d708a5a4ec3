//! Naming conventions shared by the resolver and every emitter.
//!
//! All functions here are total: empty input yields empty output.
//!
//! Pluralization is a small English heuristic. Irregular plurals
//! (`Person` -> `Persons`, `Child` -> `Childs`) are a known limitation and are
//! left as-is so generated names stay predictable.

/// Convert a PascalCase or camelCase name to lower-case, underscore-separated form.
///
/// Every uppercase ASCII letter gets a `_` in front of it; a single leading
/// separator is stripped afterwards.
///
/// # Examples
///
/// - "UserProfile" -> "user_profile"
/// - "Track" -> "track"
/// - "userID" -> "user_i_d"
pub fn to_identifier_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('_');
            result.push(c.to_ascii_lowercase());
        } else {
            result.extend(c.to_lowercase());
        }
    }

    match result.strip_prefix('_') {
        Some(stripped) => stripped.to_string(),
        None => result,
    }
}

/// Simple English pluralization.
///
/// # Examples
///
/// - "Category" -> "Categories"
/// - "Day" -> "Days"
/// - "Box" -> "Boxes"
/// - "Track" -> "Tracks"
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    if let Some(stem) = word.strip_suffix('y') {
        let preceded_by_vowel = stem
            .chars()
            .last()
            .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
        if !preceded_by_vowel {
            return format!("{stem}ies");
        }
    }

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Reduce free-form input to an alphabetic-only PascalCase entity name.
///
/// Whitespace and every non-alphabetic character are dropped and the first
/// letter is uppercased. The rest of the casing is preserved.
///
/// # Examples
///
/// - "user profile" -> "Userprofile"
/// - "statusHistory2" -> "StatusHistory"
pub fn sanitize_entity_name(raw: &str) -> String {
    let mut chars = raw.chars().filter(|c| c.is_ascii_alphabetic());
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.collect::<String>(),
    }
}

/// Storage table name for an entity: the pluralized, identifier-cased name.
///
/// Also used for route paths so URLs and tables agree.
pub fn table_name(entity_name: &str) -> String {
    to_identifier_case(&pluralize(entity_name))
}

// ============================================================================
// Tests
// ============================================================================
