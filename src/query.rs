//! Builder for Google Drive search (`q`) expressions.

use std::fmt;

/// A conjunction of Drive search predicates.
///
/// ```
/// use drive_archive::query::Query;
///
/// let q = Query::new().in_parents("folder1").name_eq("temp.txt").not_trashed();
/// assert_eq!(
///     q.to_string(),
///     "'folder1' in parents and name = 'temp.txt' and trashed = false"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    clauses: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `mimeType = '<mime>'`
    pub fn mime_type(self, mime: &str) -> Self {
        self.push(format!("mimeType = '{}'", escape(mime)))
    }

    /// `name contains '<fragment>'`
    pub fn name_contains(self, fragment: &str) -> Self {
        self.push(format!("name contains '{}'", escape(fragment)))
    }

    /// `name = '<name>'`
    pub fn name_eq(self, name: &str) -> Self {
        self.push(format!("name = '{}'", escape(name)))
    }

    /// `'<folder_id>' in parents`
    pub fn in_parents(self, folder_id: &str) -> Self {
        self.push(format!("'{}' in parents", escape(folder_id)))
    }

    /// `trashed = false`
    pub fn not_trashed(self) -> Self {
        self.push("trashed = false".to_string())
    }

    fn push(mut self, clause: String) -> Self {
        self.clauses.push(clause);
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(" and "))
    }
}

/// Escape a string literal for use inside single quotes.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
