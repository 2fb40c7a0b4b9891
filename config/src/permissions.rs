//! Permission checks used by `requires:` entries.

use std::collections::BTreeSet;

/// A command source that can answer permission queries.
///
/// Definitions compile `requires: <permission>` into a requirement calling
/// [`has_permission`](Self::has_permission) on the source.
pub trait PermissionSource {
    fn has_permission(&self, permission: &str) -> bool;
}

/// A plain set of granted permission names.
///
/// # Examples
///
/// ```
/// use marshal_config::{PermissionSet, PermissionSource};
///
/// let perms = PermissionSet::from_csv("admin, time.set,,");
/// assert!(perms.has_permission("time.set"));
/// assert!(!perms.has_permission("ban"));
/// assert_eq!(perms.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list. Entries are trimmed and empty entries
    /// are skipped.
    pub fn from_csv(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    pub fn grant(&mut self, permission: impl Into<String>) {
        self.0.insert(permission.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl PermissionSource for PermissionSet {
    fn has_permission(&self, permission: &str) -> bool {
        self.0.contains(permission)
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_trims_and_skips_empty() {
        let perms = PermissionSet::from_csv(" a ,b,, c");
        assert_eq!(perms.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_csv() {
        assert!(PermissionSet::from_csv("").is_empty());
        assert!(PermissionSet::from_csv(" , ").is_empty());
    }

    #[test]
    fn test_grant() {
        let mut perms = PermissionSet::new();
        assert!(!perms.has_permission("op"));
        perms.grant("op");
        assert!(perms.has_permission("op"));
        assert!(!perms.has_permission("OP"));
    }
}
