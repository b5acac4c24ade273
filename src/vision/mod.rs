//! Vision Layer
//!
//! Image cleanup that runs before a frame is handed to the external recognizer:
//! Gaussian kernels, the adaptive local-threshold filter and the frame type the
//! filter works on.

pub mod binarize;
pub mod frame;
pub mod kernel;

pub use binarize::{binarize_in_place, gray_to_argb, luminance, Binarizer, EDGE_PADDING};
pub use frame::{binarize_image, FrameError, PixelBuffer};
pub use kernel::{default_sigma, gaussian_kernel, Kernel, KernelError, MIN_KERNEL_SIZE};
