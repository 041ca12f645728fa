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

//! Reconstruction error of a compressed image against its source.

use crate::{Error, Format, PixelOrder};

/// Mean squared error per channel sample, in 8-bit units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mse {
    /// Averaged over the red, green and blue samples of every pixel
    pub colour: f64,
    /// Averaged over the alpha sample of every pixel
    pub alpha: f64,
}

/// Decodes `blocks` and compares the result with the source image `rgba`.
///
/// Both images are read in `order`. Pixels in the padding of edge blocks are
/// not counted.
pub fn compute_mse(
    rgba: &[u8],
    width: usize,
    height: usize,
    blocks: &[u8],
    format: Format,
    order: PixelOrder,
) -> Result<Mse, Error> {
    let decoded = format.decompress_to_vec(blocks, width, height, order)?;
    if decoded.len() != rgba.len() {
        return Err(Error::PixelBufferSize {
            expected: decoded.len(),
            actual: rgba.len(),
        });
    }

    let mut colour = 0u64;
    let mut alpha = 0u64;
    for (source, actual) in rgba.chunks_exact(4).zip(decoded.chunks_exact(4)) {
        for c in 0..3 {
            colour += (source[c] as i64 - actual[c] as i64).pow(2) as u64;
        }
        alpha += (source[3] as i64 - actual[3] as i64).pow(2) as u64;
    }

    let pixels = (width * height) as f64;
    let mse = Mse {
        colour: colour as f64 / (3.0 * pixels),
        alpha: alpha as f64 / pixels,
    };
    log::debug!("{format:?} {width}x{height}: colour mse {}, alpha mse {}", mse.colour, mse.alpha);
    Ok(mse)
}
