//! Friends field cleaning

use crate::domain::FriendsField;

/// Split a comma-delimited friends string
///
/// Names are trimmed, empty entries are dropped and order is kept.
/// Duplicates are not removed.
///
/// # Examples
///
/// ```
/// use fauna::core::transform::friends::split_friends;
///
/// assert_eq!(split_friends(" Alice, Bob ,,Carol "), vec!["Alice", "Bob", "Carol"]);
/// assert!(split_friends("").is_empty());
/// ```
pub fn split_friends(raw: &str) -> Vec<String> {
    clean(raw.split(','))
}

/// Normalize the friends field of a raw record
pub fn transform_friends(field: Option<&FriendsField>) -> Vec<String> {
    match field {
        None => Vec::new(),
        Some(FriendsField::Delimited(raw)) => split_friends(raw),
        Some(FriendsField::List(names)) => clean(names.iter().map(String::as_str)),
    }
}

fn clean<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
