//! Catalog of source files backing a dataset.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Order in which catalogued paths are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanOrder {
    /// Lexicographic by path, identical on every platform.
    #[default]
    Sorted,
    /// Whatever order the directory listing yields.
    Filesystem,
}

/// Read-only list of the regular files found in one directory.
///
/// The list is built once and never changes, so the index-to-file mapping
/// holds for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct SampleIndex {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl SampleIndex {
    /// Scan `root` with [`ScanOrder::Sorted`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `root` does not exist or cannot be listed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::open_with_order(root, ScanOrder::default())
    }

    /// Scan `root` non-recursively and keep every regular file.
    ///
    /// Symlinks are followed; entries whose metadata cannot be read, such as
    /// dangling links, are skipped. File contents are not inspected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `root` does not exist or cannot be listed.
    pub fn open_with_order<P: AsRef<Path>>(root: P, order: ScanOrder) -> Result<Self> {
        let root = root.as_ref();
        let not_found = |source| Error::NotFound {
            path: root.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(root).map_err(not_found)? {
            let path = entry.map_err(not_found)?.path();
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => paths.push(path),
                Ok(_) => {}
                Err(err) => tracing::debug!("skipping {}: {err}", path.display()),
            }
        }

        if order == ScanOrder::Sorted {
            paths.sort();
        }

        tracing::debug!("catalogued {} files in {}", paths.len(), root.display());

        Ok(Self {
            root: root.to_path_buf(),
            paths,
        })
    }

    /// Directory the catalog was built from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path of sample `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn path_at(&self, index: usize) -> Result<&Path> {
        self.paths
            .get(index)
            .map(PathBuf::as_path)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.paths.len(),
            })
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}
