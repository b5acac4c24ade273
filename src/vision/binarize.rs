//! Adaptive local-threshold binarization
//!
//! Each pixel is compared against a Gaussian-weighted mean of its neighbourhood.
//! The mean map is produced by two separable 1-D passes (rows, then columns),
//! each streamed through a ring buffer of `kernel_size` samples.

use tracing::debug;

use super::kernel::{Kernel, KernelError};

/// Value loaded for samples that fall outside the image
pub const EDGE_PADDING: i32 = 128;

const MAX_GRAY: i32 = 255;

/// Brightness of a packed `0xAARRGGBB` pixel, fixed-point 299/587/114 weights
pub fn luminance(argb: u32) -> i32 {
    let b = (argb & 0xff) as i32;
    let g = ((argb >> 8) & 0xff) as i32;
    let r = ((argb >> 16) & 0xff) as i32;
    (299 * r + 587 * g + 114 * b) / 1000
}

/// Opaque packed pixel with the gray value in all three channels
pub fn gray_to_argb(gray: i32) -> u32 {
    debug_assert!((0..=MAX_GRAY).contains(&gray), "invalid gray value: {}", gray);
    let g = gray as u32;
    0xff00_0000 | (g << 16) | (g << 8) | g
}

/// Fixed-capacity sample window with a single read/write cursor
///
/// Writing at the cursor overwrites the oldest sample once the ring is full.
/// A convolution reads the ring starting at the cursor and wraps around.
#[derive(Debug, Clone)]
struct RingBuffer {
    slots: Vec<i32>,
    cursor: usize,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity],
            cursor: 0,
        }
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Store a sample and move on
    fn push(&mut self, sample: i32) {
        self.slots[self.cursor] = sample;
        self.advance();
    }

    /// Store a sample, convolve the window as it now stands, then move on
    fn push_and_convolve(&mut self, sample: i32, kernel: &Kernel) -> i32 {
        self.slots[self.cursor] = sample;
        let value = self.convolve(kernel);
        self.advance();
        value
    }

    fn convolve(&self, kernel: &Kernel) -> i32 {
        let len = self.slots.len();
        let mut off = self.cursor;
        let mut accum = 0.0;
        for &weight in kernel.weights() {
            accum += self.slots[off] as f64 * weight;
            off += 1;
            if off == len {
                off = 0;
            }
        }
        (accum as i32).clamp(0, MAX_GRAY)
    }

    fn advance(&mut self) {
        self.cursor = if self.cursor == self.slots.len() - 1 { 0 } else { self.cursor + 1 };
    }
}

/// One line of samples inside a flat buffer
#[derive(Debug, Clone, Copy)]
struct Line {
    offset: usize,
    count: usize,
    step: usize,
}

impl Line {
    fn index(&self, n: usize) -> usize {
        self.offset + n * self.step
    }

    /// Sample `n` of the line, padding past its end
    fn sample(&self, gray: &[i32], n: usize) -> i32 {
        if n < self.count {
            gray[self.index(n)]
        } else {
            EDGE_PADDING
        }
    }
}

/// Reusable binarization filter
///
/// Holds a validated kernel, the threshold offset and the scratch ring so that
/// consecutive frames do not reallocate.
#[derive(Debug, Clone)]
pub struct Binarizer {
    kernel: Kernel,
    offset: i32,
    ring: RingBuffer,
}

impl Binarizer {
    /// Create a filter with the default sigma for `kernel_size`
    pub fn new(kernel_size: usize, offset: i32) -> Result<Self, KernelError> {
        Ok(Self::with_kernel(Kernel::with_default_sigma(kernel_size)?, offset))
    }

    /// Create a filter from an already built kernel
    pub fn with_kernel(kernel: Kernel, offset: i32) -> Self {
        let ring = RingBuffer::new(kernel.len());
        Self { kernel, offset, ring }
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Threshold offset subtracted from the local mean
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Binarize packed ARGB pixels in place
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height`.
    pub fn apply(&mut self, pixels: &mut [u32], width: usize, height: usize) {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixel buffer does not match {}x{}",
            width,
            height
        );
        debug!("Binarizing {}x{} frame (kernel {}, c = {})", width, height, self.kernel.len(), self.offset);

        let mut gray: Vec<i32> = pixels.iter().map(|&p| luminance(p)).collect();

        let mut thresholds = gray.clone();
        self.local_mean_in_place(&mut thresholds, width, height);

        apply_threshold(&mut gray, |i| i64::from(thresholds[i]) - i64::from(self.offset));

        for (dst, &g) in pixels.iter_mut().zip(&gray) {
            *dst = gray_to_argb(g);
        }
    }

    /// Replace every gray sample with its Gaussian-weighted local mean
    pub fn local_mean_in_place(&mut self, gray: &mut [i32], width: usize, height: usize) {
        for row in 0..height {
            let line = Line { offset: row * width, count: width, step: 1 };
            self.filter_line(gray, line);
        }

        for col in 0..width {
            let line = Line { offset: col, count: height, step: width };
            self.filter_line(gray, line);
        }
    }

    /// Stream one row or column through the ring
    ///
    /// The ring is primed with `half` padding samples and the first `half` real
    /// samples. Every further load produces the output for the position `half`
    /// samples behind it; past the end of the line padding is loaded instead.
    fn filter_line(&mut self, gray: &mut [i32], line: Line) {
        let half = self.kernel.half_size();

        self.ring.reset();
        for _ in 0..half {
            self.ring.push(EDGE_PADDING);
        }
        for n in 0..half {
            self.ring.push(line.sample(gray, n));
        }

        for n in half..line.count + half {
            let mean = self.ring.push_and_convolve(line.sample(gray, n), &self.kernel);
            gray[line.index(n - half)] = mean;
        }
    }
}

/// Keep pixels darker than their threshold, brighten the rest
///
/// Pixels at or above the threshold are doubled and clamped to white; this is
/// not a 0/255 split. Thresholds are `i64` so any `i32` offset fits.
fn apply_threshold(gray: &mut [i32], threshold: impl Fn(usize) -> i64) {
    for (i, g) in gray.iter_mut().enumerate() {
        if i64::from(*g) >= threshold(i) {
            *g = (*g * 2).min(MAX_GRAY);
        }
    }
}

/// Binarize packed ARGB pixels in place with a default-sigma kernel
///
/// Kernel parameters are checked before the buffer is touched.
///
/// # Panics
///
/// Panics if `pixels.len() != width * height`.
pub fn binarize_in_place(
    pixels: &mut [u32],
    width: usize,
    height: usize,
    kernel_size: usize,
    c: i32,
) -> Result<(), KernelError> {
    let mut binarizer = Binarizer::new(kernel_size, c)?;
    binarizer.apply(pixels, width, height);
    Ok(())
}
