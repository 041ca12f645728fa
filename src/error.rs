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

//! Error types for image compression and decompression.

use crate::flags::Flags;
use thiserror::Error;

/// Errors reported before any block is processed. No output is written
/// when one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Width or height is zero, or the pixel count overflows.
    #[error("Invalid image dimensions {width}x{height}. Both must be positive.")]
    InvalidDimensions {
        /// The requested width in pixels
        width: usize,
        /// The requested height in pixels
        height: usize,
    },

    /// The pixel buffer does not hold exactly `width * height * 4` bytes.
    #[error("Pixel buffer has {actual} bytes, but the image needs exactly {expected} bytes.")]
    PixelBufferSize {
        /// The required size in bytes
        expected: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The block buffer does not match the size implied by the format.
    #[error("Block buffer has {actual} bytes, but the image needs exactly {expected} bytes.")]
    BlockBufferSize {
        /// The required size in bytes
        expected: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// More than one format flag was set.
    #[error("Conflicting format flags: {0:?}")]
    ConflictingFormats(Flags),

    /// More than one colour fit flag was set.
    #[error("Conflicting colour fit flags: {0:?}")]
    ConflictingAlgorithms(Flags),
}
