//! One loaded Go file and the queries that run against it.

use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use goscan_syntax::{ParseOptions, SyntaxTree};
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::extract::{self, Record, TagSet};
use crate::funcs;
use crate::value::Primitive;

/// A parsed Go source file with its comments attached.
///
/// Loading is the only fallible step. The tree is never mutated afterwards,
/// so queries may run in any order and from several threads at once.
#[derive(Debug)]
pub struct GoSource {
    path: Option<PathBuf>,
    tree: SyntaxTree,
}

impl GoSource {
    /// Reads and parses the file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &ParseOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let io_err = |source| Error::Io { path: path.to_owned(), source };

        let meta = fs::metadata(path).map_err(io_err)?;
        if meta.is_dir() {
            return Err(Error::NotAFile { path: path.to_owned() });
        }
        let text = fs::read_to_string(path).map_err(io_err)?;

        let tree = SyntaxTree::parse_with(text, options).inspect_err(|err| {
            tracing::debug!(path = %path.display(), %err, "rejected source file");
        })?;
        tracing::debug!(path = %path.display(), decls = tree.decls().len(), "loaded source file");

        Ok(Self { path: Some(path.to_owned()), tree })
    }

    /// Parses in-memory source text.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        Self::parse_with(text, &ParseOptions::default())
    }

    pub fn parse_with(text: impl Into<String>, options: &ParseOptions) -> Result<Self> {
        Ok(Self {
            path: None,
            tree: SyntaxTree::parse_with(text, options)?,
        })
    }

    /// File the source was read from; `None` for parsed text.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn package_name(&self) -> &str {
        self.tree.package_name()
    }

    /// Tagged single-literal declarations decoding as `T`.
    pub fn scalar_values<T: Primitive>(&self, tags: &TagSet) -> Vec<Record<T>> {
        extract::scalar_values(&self.tree, tags)
    }

    /// Tagged `[]T{...}` declarations.
    pub fn sequence_values<T: Primitive>(&self, tags: &TagSet) -> Vec<Record<Vec<T>>> {
        extract::sequence_values(&self.tree, tags)
    }

    /// Tagged `map[K]V{...}` declarations.
    pub fn mapping_values<K, V>(&self, tags: &TagSet) -> Vec<Record<IndexMap<K, V>>>
    where
        K: Primitive + Eq + Hash,
        V: Primitive,
    {
        extract::mapping_values(&self.tree, tags)
    }

    /// See [`funcs::function_names`].
    pub fn function_names(&self, receiver: &str, params: &[&str]) -> Vec<String> {
        funcs::function_names(&self.tree, receiver, params)
    }
}
