//! Path utilities for splitting and comparing request paths
//!
//! All functions are **pure**: given same input, always produce same output
//! with no side effects.

/// Splits a request path into its non-empty segments
///
/// Leading, trailing and doubled slashes leave no empty segments behind.
///
/// # Examples
///
/// ```
/// use switchyard::path::split_path;
///
/// assert_eq!(split_path("/docs/user/manual"), vec!["docs", "user", "manual"]);
/// assert_eq!(split_path("/comment/"), vec!["comment"]);
/// assert_eq!(split_path("//a//b//"), vec!["a", "b"]);
/// assert!(split_path("/").is_empty());
/// assert!(split_path("").is_empty());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Case-insensitive comparison used for literal segments
///
/// Compares character by character after Unicode lowercasing, without
/// allocating.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.len() == b.len() && a.eq_ignore_ascii_case(b) {
        return true;
    }
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
