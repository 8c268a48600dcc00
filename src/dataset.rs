//! Caller-facing dataset: index lookup plus pair generation.

use std::path::Path;

use rayon::prelude::*;

use crate::error::Result;
use crate::index::{SampleIndex, ScanOrder};
use crate::pipeline::{Config, ImagePair, Pipeline};

/// Super-resolution training pairs backed by a directory of images.
///
/// Sample `i` is the pair generated from the `i`-th catalogued file. Nothing is
/// cached; every [`SrDataset::get`] decodes its source again.
#[derive(Debug, Clone)]
pub struct SrDataset {
    index: SampleIndex,
    pipeline: Pipeline,
}

impl SrDataset {
    /// Catalog `root` (sorted) and configure the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or `root` cannot be
    /// listed.
    pub fn open<P: AsRef<Path>>(root: P, config: Config) -> Result<Self> {
        Self::open_with_order(root, config, ScanOrder::default())
    }

    /// Like [`SrDataset::open`] with an explicit catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or `root` cannot be
    /// listed.
    pub fn open_with_order<P: AsRef<Path>>(
        root: P,
        config: Config,
        order: ScanOrder,
    ) -> Result<Self> {
        // Configuration errors win over filesystem errors.
        let pipeline = Pipeline::new(config)?;
        let index = SampleIndex::open_with_order(root, order)?;
        Ok(Self::from_parts(index, pipeline))
    }

    #[must_use]
    pub const fn from_parts(index: SampleIndex, pipeline: Pipeline) -> Self {
        Self { index, pipeline }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub const fn index(&self) -> &SampleIndex {
        &self.index
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Source file of sample `index`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IndexOutOfRange`] if `index >= len()`.
    pub fn path(&self, index: usize) -> Result<&Path> {
        self.index.path_at(index)
    }

    /// Generate sample `index`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IndexOutOfRange`] for a bad index and
    /// [`crate::Error::Decode`] if the source file is not a readable image.
    pub fn get(&self, index: usize) -> Result<ImagePair> {
        let path = self.index.path_at(index)?;
        tracing::trace!("sample {index}: {}", path.display());
        self.pipeline.produce_pair(path)
    }

    /// Generate several samples on the rayon thread pool.
    ///
    /// Results are in the order of `indices`; each one succeeds or fails on its
    /// own.
    #[must_use]
    pub fn get_many(&self, indices: &[usize]) -> Vec<Result<ImagePair>> {
        indices.par_iter().map(|&i| self.get(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, TargetSize};
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_get_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 8, 8);
        let ds = SrDataset::open(dir.path(), Config::new(TargetSize::square(8), 2)).unwrap();

        assert_eq!(ds.len(), 1);
        assert!(ds.get(0).is_ok());
        assert!(matches!(
            ds.get(1),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_get_many_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "0.png", 10, 10);
        write_png(dir.path(), "1.png", 30, 20);
        std::fs::write(dir.path().join("2.txt"), b"nope").unwrap();
        let ds = SrDataset::open(dir.path(), Config::new(TargetSize::square(16), 4)).unwrap();

        let results = ds.get_many(&[2, 0, 5, 1]);
        assert_eq!(results.len(), 4);
        assert!(matches!(results[0], Err(Error::Decode { .. })));
        assert_eq!(results[1].as_ref().unwrap(), &ds.get(0).unwrap());
        assert!(matches!(results[2], Err(Error::IndexOutOfRange { .. })));
        assert_eq!(results[3].as_ref().unwrap(), &ds.get(1).unwrap());
    }

    #[test]
    fn test_invalid_config_before_scan() {
        let config = Config::new(TargetSize::square(64), 0);
        let err = SrDataset::open("/definitely/not/here", config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_dataset_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SrDataset>();
    }
}
