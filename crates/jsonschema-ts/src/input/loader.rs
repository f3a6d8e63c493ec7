//! Reading referenced schema files.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Supplies the text of schema files reached through cross-file `$ref`s.
pub trait SchemaLoader {
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SchemaLoader for FsLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves schema text from memory, keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), contents.into());
    }
}

impl SchemaLoader for MemoryLoader {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize_path(path))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such schema"))
    }
}

/// Lexically resolve `.` and `..` without touching the file system.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether a `$ref` points at a network location.
pub fn is_remote(reference: &str) -> bool {
    reference.contains("://") || reference.starts_with("http:") || reference.starts_with("https:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dots() {
        assert_eq!(normalize_path(Path::new("a/./b/../c.json")), PathBuf::from("a/c.json"));
        assert_eq!(normalize_path(Path::new("../x.json")), PathBuf::from("../x.json"));
        assert_eq!(normalize_path(Path::new("a/../../x.json")), PathBuf::from("../x.json"));
        assert_eq!(normalize_path(Path::new("/a/../../x.json")), PathBuf::from("/x.json"));
    }

    #[test]
    fn memory_loader_ignores_spelling() {
        let loader = MemoryLoader::new().with_file("schemas/a.json", "{}");
        assert_eq!(loader.read(Path::new("schemas/sub/../a.json")).unwrap(), "{}");
        assert_eq!(
            loader.read(Path::new("missing.json")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn remote_references() {
        assert!(is_remote("http://example.com/schema.json"));
        assert!(is_remote("https://example.com/schema.json"));
        assert!(!is_remote("./local.json"));
    }
}
