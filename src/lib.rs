//! # srpairs
//!
//! Paired low/high resolution training samples for super-resolution models.
//!
//! Every regular file in a source directory becomes one sample. The image is
//! resized to the high-resolution target, downscaled by an integer factor with
//! an antialiased bicubic filter, and both results are returned as
//! channel-first tensors with values in `[0, 1]`.
//!
//! ## Example
//!
//! ```no_run
//! use srpairs::{Config, SrDataset, TargetSize};
//!
//! # fn main() -> srpairs::Result<()> {
//! let dataset = SrDataset::open("data/train", Config::new(TargetSize::square(256), 4))?;
//!
//! let (lr, hr) = dataset.get(0)?.into_tuple();
//! assert_eq!(lr.shape(), (3, 64, 64));
//! assert_eq!(hr.shape(), (3, 256, 256));
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod error;
pub mod image;
pub mod index;
pub mod pipeline;

pub use dataset::SrDataset;
pub use error::{Error, Result};
pub use index::{SampleIndex, ScanOrder};
pub use pipeline::{Config, ImagePair, Pipeline, TargetSize};
