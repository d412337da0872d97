pub mod auth_service;
pub mod store;
pub mod todo_service;

/// Required string input; blank counts as missing.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
