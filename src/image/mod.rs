//! Image decoding, tensor conversion, and saving utilities.

mod load;
mod save;
mod tensor;

pub use load::{decode_image, to_8bit};
pub use save::{save_tensor, tensor_to_image};
pub use tensor::{image_to_tensor, PixelTensor, Precision, RangeNorm, TensorFormat};

use ndarray::Array3;

/// Full-precision image tensor in CHW format (channels, height, width).
pub type ImageTensor = Array3<f32>;

/// Largest 8-bit sample value.
pub const MAX_SAMPLE: f32 = 255.0;
