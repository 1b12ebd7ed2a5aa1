//! Naming conventions - derives default key and table names from identifiers

/// Convert a type identifier to snake_case (`UserProfile` -> `user_profile`)
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Simple singularization (English-centric)
pub fn singularize(name: &str) -> String {
    if name.ends_with("ies") {
        format!("{}y", &name[..name.len() - 3])
    } else if name.ends_with("ses")
        || name.ends_with("ches")
        || name.ends_with("shes")
        || name.ends_with("xes")
        || name.ends_with("zes")
    {
        name[..name.len() - 2].to_string()
    } else if name.ends_with('s') && name.len() > 1 {
        name[..name.len() - 1].to_string()
    } else {
        name.to_string()
    }
}

/// Simple pluralization (English-centric)
pub fn pluralize(name: &str) -> String {
    let vowel_y = ["ay", "ey", "iy", "oy", "uy"];
    if name.ends_with('y') && !vowel_y.iter().any(|s| name.ends_with(s)) {
        format!("{}ies", &name[..name.len() - 1])
    } else if name.ends_with('s')
        || name.ends_with("sh")
        || name.ends_with("ch")
        || name.ends_with('x')
        || name.ends_with('z')
    {
        format!("{}es", name)
    } else {
        format!("{}s", name)
    }
}

/// Default junction table name: both table names singularized, sorted
/// alphabetically, joined by an underscore (`users` + `skills` -> `skill_user`)
pub fn pivot_table_name(table_a: &str, table_b: &str) -> String {
    let mut parts = [singularize(table_a), singularize(table_b)];
    parts.sort();
    parts.join("_")
}

/// Default pivot foreign-key column: the entity's singular snake_case name
/// concatenated with the key's storage column (`User` + `id` -> `user_id`)
pub fn pivot_foreign_key_name(entity: &str, adapter_key: &str) -> String {
    format!("{}_{}", snake_case(entity), adapter_key)
}

/// Alias for a pivot column in a projection; the prefix keeps pivot values
/// from colliding with the related entity's own columns
pub fn pivot_alias(column: &str) -> String {
    format!("pivot_{}", column)
}
