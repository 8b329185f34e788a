/// Dot placement rules for the local part: no leading/trailing dot,
/// no consecutive dots. Character membership is handled by the
/// full-address pattern in `mod.rs`.
pub(crate) fn dot_violation(local: &str) -> Option<&'static str> {
    if local.starts_with('.') || local.ends_with('.') {
        return Some("local part cannot start or end with '.'");
    }
    if local.contains("..") {
        return Some("local part cannot contain consecutive dots");
    }
    None
}
