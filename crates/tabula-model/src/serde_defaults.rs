/// Serde helper for `#[serde(default = "crate::serde_defaults::one")]`.
///
/// Prefer the fully-qualified path in serde attributes to avoid having to import these symbols
/// into individual modules.
pub(crate) const fn one() -> u32 {
    1
}

/// Serde helper for `#[serde(skip_serializing_if = "crate::serde_defaults::is_one")]`.
pub(crate) fn is_one(value: &u32) -> bool {
    *value == 1
}

/// Serde helper for `#[serde(skip_serializing_if = "crate::serde_defaults::is_false")]`.
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
