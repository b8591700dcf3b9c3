//! User-facing results printed on stdout

use std::fmt;
use std::io::{self, Write};

/// Two-column (tag, digest) table, left-aligned with one space of padding
/// after the widest tag. Rows keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    rows: Vec<(String, String)>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: impl Into<String>, digest: impl Into<String>) {
        self.rows.push((tag.into(), digest.into()));
    }

    pub fn rows(&self) -> &[(String, String)] {
        &self.rows
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }
}

impl fmt::Display for TagTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|(tag, _)| tag.chars().count())
            .max()
            .unwrap_or(0)
            + 1;

        for (tag, digest) in &self.rows {
            writeln!(f, "{:<width$}{}", tag, digest, width = width)?;
        }
        Ok(())
    }
}

/// Confirmation printed after a successful add-tag run
pub fn tag_added_message(new_tag: &str, image: &str) -> String {
    format!("{} added to {}", new_tag, image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let mut table = TagTable::new();
        table.push("latest", "sha256:aaa");
        table.push("v1", "sha256:aaa");
        table.push("release-2024", "sha256:aaa");

        assert_eq!(
            table.to_string(),
            "latest       sha256:aaa\nv1           sha256:aaa\nrelease-2024 sha256:aaa\n"
        );
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        assert_eq!(TagTable::new().to_string(), "");
    }

    #[test]
    fn test_write_to() {
        let mut table = TagTable::new();
        table.push("latest", "sha256:aaa");
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "latest sha256:aaa\n");
    }

    #[test]
    fn test_tag_added_message() {
        assert_eq!(
            tag_added_message("v2", "registry/img:latest"),
            "v2 added to registry/img:latest"
        );
    }
}
