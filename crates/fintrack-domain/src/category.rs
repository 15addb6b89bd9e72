//! Suggested transaction categories.

/// Categories offered by the entry form. Stored transactions may carry any
/// non-empty category; imports in particular accept arbitrary strings.
pub const SUGGESTED_CATEGORIES: [&str; 10] = [
    "Lazer",
    "Estudo",
    "Comida",
    "Transporte",
    "Namoro",
    "Saúde",
    "Casa",
    "Trabalho",
    "Investimentos",
    "Outros",
];

/// Returns `true` when `name` matches one of the suggested categories (case-insensitive).
pub fn is_suggested_category(name: &str) -> bool {
    let needle = name.trim().to_lowercase();
    SUGGESTED_CATEGORIES
        .iter()
        .any(|candidate| candidate.to_lowercase() == needle)
}
