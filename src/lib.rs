// Copyright (c) 2006 Simon Brown <si@sjbrown.co.uk>
// Copyright (c) 2018-2021 Jan Solanti <jhs@psonet.com>
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to	deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
// OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! A pure Rust DXT1/3/5, BC4 and BC5 compressor and decompressor based on
//! Simon Brown's **libsquish**.
//!
//! BCn formats are laid out in 4x4 pixel blocks of the following types:
//! * DXT1 (BC1): colour with optional 1-bit alpha, 8 bytes
//! * DXT3 (BC2): explicit 4-bit alpha, colour, 16 bytes
//! * DXT5 (BC3): gradient alpha, colour, 16 bytes
//! * BC4: gradient red, 8 bytes
//! * BC5: gradient red, gradient green, 16 bytes
//!
//! BC4 and BC5 reuse the alpha compression scheme for arbitrary one- and two-channel images.
//! Graphics APIs commonly refer to them as "grayscale", "luminance" or simply "red" for BC4 and
//! "rg" or "luminance + alpha" for BC5 respectively.
//!
//! Images whose dimensions are not a multiple of 4 are padded by repeating
//! the last row and column of pixels into the incomplete edge blocks.
//!
//! ```
//! use squish_bcn::{Format, Params, PixelOrder};
//!
//! let rgba = [255u8; 8 * 8 * 4];
//! let blocks = Format::Dxt1.compress_to_vec(&rgba, 8, 8, Params::default()).unwrap();
//! assert_eq!(blocks.len(), 4 * 8);
//!
//! let pixels = Format::Dxt1.decompress_to_vec(&blocks, 8, 8, PixelOrder::Rgba).unwrap();
//! assert_eq!(pixels, rgba);
//! ```

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod alpha;
mod bc1;
mod bc2;
mod bc3;
mod bc4;
mod bc5;
mod colourblock;
mod colourfit;
mod colourset;
mod error;
mod flags;
mod math;
mod mse;

use crate::colourfit::{ClusterFit, ColourFit, ColourFitImpl, RangeFit, SingleColourFit};
use crate::colourset::ColourSet;
use alloc::vec;
use alloc::vec::Vec;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

// re-export the BC formats
pub use bc1::BC1;
pub use bc2::BC2;
pub use bc3::BC3;
pub use bc4::BC4;
pub use bc5::BC5;

pub use error::Error;
pub use flags::Flags;
pub use mse::{compute_mse, Mse};

/// Defines a compression algorithm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Fast, low quality
    RangeFit,

    /// Slow, high quality
    #[default]
    ClusterFit,

    /// Very slow, very high quality
    IterativeClusterFit,
}

/// RGB colour channel weights for use in block fitting
pub type ColourWeights = [f32; 3];

/// Uniform weights for each colour channel
pub const COLOUR_WEIGHTS_UNIFORM: ColourWeights = [1.0, 1.0, 1.0];

/// Weights based on the perceived brightness of each colour channel
pub const COLOUR_WEIGHTS_PERCEPTUAL: ColourWeights = [0.2126, 0.7152, 0.0722];

/// Channel order of uncompressed pixel buffers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelOrder {
    #[default]
    Rgba,
    Bgra,
}

impl PixelOrder {
    /// Converts a pixel between this order and RGBA (the swap is its own inverse)
    fn swizzle(self, pixel: [u8; 4]) -> [u8; 4] {
        match self {
            PixelOrder::Rgba => pixel,
            PixelOrder::Bgra => [pixel[2], pixel[1], pixel[0], pixel[3]],
        }
    }
}

/// Compressor parameters.
///
/// For DXT1, any pixel with alpha below 128 is left out of the colour fit and
/// encoded with the transparent index, so it decodes as transparent black.
#[derive(Clone, Copy, Debug)]
pub struct Params {
    /// The compression algorithm to be used
    pub algorithm: Algorithm,

    /// Weigh the relative importance of each colour channel when fitting
    /// (defaults to uniform weights)
    pub weights: ColourWeights,

    /// Weigh colour by alpha during cluster fit (defaults to false)
    ///
    /// This can significantly increase perceived quality for images that are rendered
    /// using alpha blending.
    pub weigh_colour_by_alpha: bool,

    /// Channel order of the source image (defaults to RGBA)
    pub order: PixelOrder,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            algorithm: Algorithm::default(),
            weights: COLOUR_WEIGHTS_UNIFORM,
            weigh_colour_by_alpha: false,
            order: PixelOrder::default(),
        }
    }
}

/// Returns number of blocks needed for an image of given dimension
fn num_blocks(size: usize) -> usize {
    (size + 3) / 4
}

fn f32_to_i32_clamped(a: f32, limit: i32) -> i32 {
    (libm::roundf(a) as i32).max(0).min(limit)
}

/// Checks the image dimensions and returns the number of bytes its pixel buffer needs
fn image_size(width: usize, height: usize) -> Result<usize, Error> {
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(4))
        .filter(|_| width > 0 && height > 0)
        .ok_or(Error::InvalidDimensions { width, height })
}

fn check_len(expected: usize, actual: usize, err: fn(usize, usize) -> Error) -> Result<(), Error> {
    if expected == actual {
        Ok(())
    } else {
        Err(err(expected, actual))
    }
}

fn pixel_buffer_error(expected: usize, actual: usize) -> Error {
    Error::PixelBufferSize { expected, actual }
}

fn block_buffer_error(expected: usize, actual: usize) -> Error {
    Error::BlockBufferSize { expected, actual }
}

/// Validates the buffers of a compress or decompress call
fn validate(
    width: usize,
    height: usize,
    pixels: usize,
    blocks: usize,
    block_size: usize,
) -> Result<(), Error> {
    let result = image_size(width, height).and_then(|expected| {
        check_len(expected, pixels, pixel_buffer_error)?;
        let expected = num_blocks(width) * num_blocks(height) * block_size;
        check_len(expected, blocks, block_buffer_error)
    });
    if let Err(err) = &result {
        log::debug!("rejecting {width}x{height} image: {err}");
    }
    result
}

/// This module is used for sealing traits.
/// See <https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed>
mod private {
    use crate::*;

    pub trait BlockFormat {
        /// Returns how many bytes a 4x4 block of pixels will compress into.
        fn block_size() -> usize;

        /// The format's name in log output
        fn name() -> &'static str;
    }

    pub trait Decoder: BlockFormat {
        /// Decompresses a 4x4 block of pixels
        ///
        /// * `block`  - The compressed block of pixels
        fn decompress_block(block: &[u8]) -> [[u8; 4]; 16];
    }

    pub trait Encoder: BlockFormat {
        /// Compresses a 4x4 block of pixels, masking out some pixels e.g. for padding the
        /// image to a multiple of the block size.
        ///
        /// * `rgba`   - The uncompressed block of pixels
        /// * `mask`   - The valid pixel mask
        /// * `params` - Additional compressor parameters
        /// * `output` - Storage for the compressed block
        fn compress_block_masked(rgba: [[u8; 4]; 16], mask: u32, params: Params, output: &mut [u8]);
    }
}

/// Abstraction over any decoder for any format.
/// Note that this trait is sealed, i.e. it can not be implemented outside of this crate.
pub trait Decoder: private::Decoder {
    /// Decompresses an image in memory
    ///
    /// * `data`   - The compressed image data
    /// * `width`  - The width of the source image
    /// * `height` - The height of the source image
    /// * `order`  - Channel order to write the pixels in
    /// * `output` - Space to store the decompressed image, exactly `width * height * 4` bytes
    fn decompress(
        data: &[u8],
        width: usize,
        height: usize,
        order: PixelOrder,
        output: &mut [u8],
    ) -> Result<(), Error> {
        let block_size = Self::block_size();
        validate(width, height, output.len(), data.len(), block_size)?;

        let blocks_wide = num_blocks(width);
        log::trace!(
            "decompressing {}x{} {} image ({} blocks)",
            width,
            height,
            Self::name(),
            blocks_wide * num_blocks(height)
        );

        let row_bytes = width * 4;
        let block_rows = data.chunks(blocks_wide * block_size);

        #[cfg(feature = "rayon")]
        let output_rows = output.par_chunks_mut(row_bytes * 4).zip(block_rows.collect::<Vec<_>>());
        #[cfg(not(feature = "rayon"))]
        let output_rows = output.chunks_mut(row_bytes * 4).zip(block_rows);

        // loop over rows of blocks
        output_rows.for_each(|(output_row, block_row)| {
            let rows = output_row.len() / row_bytes;
            for (x, block) in block_row.chunks(block_size).enumerate() {
                let rgba = Self::decompress_block(block);

                // write the in-bounds pixels to the correct image location
                for py in 0..rows {
                    for px in 0..4 {
                        let sx = 4 * x + px;
                        if sx < width {
                            let dst = 4 * (sx + py * width);
                            output_row[dst..dst + 4].copy_from_slice(&order.swizzle(rgba[px + py * 4]));
                        }
                    }
                }
            }
        });

        Ok(())
    }
}

/// Abstraction over any encoder for any format.
/// Note that this trait is sealed, i.e. it can not be implemented outside of this crate.
pub trait Encoder: private::Encoder {
    /// Computes the amount of space in bytes needed for an image of given size,
    /// accounting for padding to a multiple of 4x4 pixels
    ///
    /// * `width`  - Width of the uncompressed image
    /// * `height` - Height of the uncompressed image
    fn compressed_size(width: usize, height: usize) -> usize {
        // Number of blocks required for image of given dimensions
        let blocks = num_blocks(width) * num_blocks(height);
        blocks * Self::block_size()
    }

    /// Compresses an image in memory
    ///
    /// * `rgba`   - The uncompressed pixel data, in the channel order given by `params`
    /// * `width`  - The width of the source image
    /// * `height` - The height of the source image
    /// * `params` - Additional compressor parameters
    /// * `output` - Output buffer for the compressed image, exactly
    ///   `compressed_size(width, height)` bytes
    fn compress(
        rgba: &[u8],
        width: usize,
        height: usize,
        params: Params,
        output: &mut [u8],
    ) -> Result<(), Error> {
        let block_size = Self::block_size();
        validate(width, height, rgba.len(), output.len(), block_size)?;

        let blocks_wide = num_blocks(width);
        log::trace!(
            "compressing {}x{} image as {} with {:?} ({} blocks)",
            width,
            height,
            Self::name(),
            params.algorithm,
            blocks_wide * num_blocks(height)
        );

        #[cfg(feature = "rayon")]
        let output_rows = output.par_chunks_mut(blocks_wide * block_size);
        #[cfg(not(feature = "rayon"))]
        let output_rows = output.chunks_mut(blocks_wide * block_size);

        output_rows.enumerate().for_each(|(y, output_row)| {
            let mut source_rgba = [[0u8; 4]; 16];
            let output_blocks = output_row.chunks_mut(block_size);

            output_blocks.enumerate().for_each(|(x, output_block)| {
                // build the 4x4 block of pixels, repeating the last column and row
                // of the image into positions beyond its edges
                for py in 0..4 {
                    for px in 0..4 {
                        let sx = (4 * x + px).min(width - 1);
                        let sy = (4 * y + py).min(height - 1);

                        let src_index = 4 * (width * sy + sx);
                        let mut pixel = [0u8; 4];
                        pixel.copy_from_slice(&rgba[src_index..src_index + 4]);
                        source_rgba[4 * py + px] = params.order.swizzle(pixel);
                    }
                }

                Self::compress_block_masked(source_rgba, 0xFFFF, params, output_block);
            });
        });

        Ok(())
    }
}

/// Runtime selection of a block format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// BC1: colour with optional 1-bit alpha. Source alpha below 128 decodes
    /// as transparent black, anything else as opaque.
    Dxt1,
    /// BC2: explicit 4-bit alpha and colour
    Dxt3,
    /// BC3: interpolated alpha and colour
    Dxt5,
    /// Interpolated red channel
    Bc4,
    /// Interpolated red and green channels
    Bc5,
}

impl Format {
    /// Returns how many bytes a 4x4 block of pixels will compress into
    pub fn block_size(self) -> usize {
        use private::BlockFormat;
        match self {
            Format::Dxt1 => BC1::block_size(),
            Format::Dxt3 => BC2::block_size(),
            Format::Dxt5 => BC3::block_size(),
            Format::Bc4 => BC4::block_size(),
            Format::Bc5 => BC5::block_size(),
        }
    }

    /// Computes the amount of space in bytes needed for an image of given size,
    /// accounting for padding to a multiple of 4x4 pixels
    pub fn compressed_size(self, width: usize, height: usize) -> usize {
        num_blocks(width) * num_blocks(height) * self.block_size()
    }

    /// Compresses an image into `output`, see [`Encoder::compress`]
    pub fn compress(
        self,
        rgba: &[u8],
        width: usize,
        height: usize,
        params: Params,
        output: &mut [u8],
    ) -> Result<(), Error> {
        match self {
            Format::Dxt1 => BC1::compress(rgba, width, height, params, output),
            Format::Dxt3 => BC2::compress(rgba, width, height, params, output),
            Format::Dxt5 => BC3::compress(rgba, width, height, params, output),
            Format::Bc4 => BC4::compress(rgba, width, height, params, output),
            Format::Bc5 => BC5::compress(rgba, width, height, params, output),
        }
    }

    /// Compresses an image into a newly allocated block buffer
    pub fn compress_to_vec(
        self,
        rgba: &[u8],
        width: usize,
        height: usize,
        params: Params,
    ) -> Result<Vec<u8>, Error> {
        image_size(width, height)?;
        let mut output = vec![0u8; self.compressed_size(width, height)];
        self.compress(rgba, width, height, params, &mut output)?;
        Ok(output)
    }

    /// Decompresses an image into `output`, see [`Decoder::decompress`]
    pub fn decompress(
        self,
        data: &[u8],
        width: usize,
        height: usize,
        order: PixelOrder,
        output: &mut [u8],
    ) -> Result<(), Error> {
        match self {
            Format::Dxt1 => BC1::decompress(data, width, height, order, output),
            Format::Dxt3 => BC2::decompress(data, width, height, order, output),
            Format::Dxt5 => BC3::decompress(data, width, height, order, output),
            Format::Bc4 => BC4::decompress(data, width, height, order, output),
            Format::Bc5 => BC5::decompress(data, width, height, order, output),
        }
    }

    /// Decompresses an image into a newly allocated pixel buffer
    pub fn decompress_to_vec(
        self,
        data: &[u8],
        width: usize,
        height: usize,
        order: PixelOrder,
    ) -> Result<Vec<u8>, Error> {
        let mut output = vec![0u8; image_size(width, height)?];
        self.decompress(data, width, height, order, &mut output)?;
        Ok(output)
    }

    /// Compresses a single 4x4 block of RGBA pixels. `params.order` is ignored.
    pub fn compress_block(
        self,
        rgba: [[u8; 4]; 16],
        params: Params,
        output: &mut [u8],
    ) -> Result<(), Error> {
        self.compress_block_masked(rgba, 0xFFFF, params, output)
    }

    /// Compresses a single 4x4 block of RGBA pixels. Pixels whose bit in `mask`
    /// is clear do not influence the fit, and decode to unspecified values.
    /// `params.order` is ignored.
    pub fn compress_block_masked(
        self,
        rgba: [[u8; 4]; 16],
        mask: u32,
        params: Params,
        output: &mut [u8],
    ) -> Result<(), Error> {
        use private::Encoder;
        check_len(self.block_size(), output.len(), block_buffer_error)?;
        match self {
            Format::Dxt1 => BC1::compress_block_masked(rgba, mask, params, output),
            Format::Dxt3 => BC2::compress_block_masked(rgba, mask, params, output),
            Format::Dxt5 => BC3::compress_block_masked(rgba, mask, params, output),
            Format::Bc4 => BC4::compress_block_masked(rgba, mask, params, output),
            Format::Bc5 => BC5::compress_block_masked(rgba, mask, params, output),
        }
        Ok(())
    }

    /// Decompresses a single block into 16 RGBA pixels
    pub fn decompress_block(self, block: &[u8]) -> Result<[[u8; 4]; 16], Error> {
        use private::Decoder;
        check_len(self.block_size(), block.len(), block_buffer_error)?;
        Ok(match self {
            Format::Dxt1 => BC1::decompress_block(block),
            Format::Dxt3 => BC2::decompress_block(block),
            Format::Dxt5 => BC3::decompress_block(block),
            Format::Bc4 => BC4::decompress_block(block),
            Format::Bc5 => BC5::decompress_block(block),
        })
    }
}

fn compress_bc1_bc2_bc3_colour_block(
    rgba: [[u8; 4]; 16],
    mask: u32,
    params: Params,
    output: &mut [u8],
    is_bc1: bool,
) {
    // create the minimal point set
    let colours = ColourSet::new(&rgba, mask, is_bc1, params.weigh_colour_by_alpha);

    let colour_offset = if is_bc1 { 0 } else { 8 };
    let colour_block = &mut output[colour_offset..colour_offset + 8];

    // compress with appropriate compression algorithm
    if colours.count() == 1 {
        // Single colour fit can't handle fully transparent blocks, hence the
        // set has to contain at least 1 colour. It's also not very useful for
        // anything more complex so we only use it for blocks of uniform colour.
        let mut fit = SingleColourFit::new(&colours, is_bc1, params.weights);
        fit.compress(colour_block);
    } else if (params.algorithm == Algorithm::RangeFit) || (colours.count() == 0) {
        let mut fit = RangeFit::new(&colours, is_bc1, params.weights);
        fit.compress(colour_block);
    } else {
        // the cluster search only replaces the range fit when it does better
        let mut range = RangeFit::new(&colours, is_bc1, params.weights);
        range.compress(colour_block);

        let iterate = params.algorithm == Algorithm::IterativeClusterFit;
        let mut fit =
            ClusterFit::new(&colours, is_bc1, params.weights, iterate).seeded(*range.best());
        fit.compress(colour_block);
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------
