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

//! The flag word used by libsquish-style APIs, resolved into [`Format`] and [`Params`].

use crate::{Algorithm, ColourWeights, Error, Format, Params, PixelOrder, COLOUR_WEIGHTS_UNIFORM};

bitflags::bitflags! {
    /// Compression options packed into one word, bit compatible with libsquish.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// Use DXT1 (BC1) compression
        const DXT1 = 1 << 0;
        /// Use DXT3 (BC2) compression
        const DXT3 = 1 << 1;
        /// Use DXT5 (BC3) compression
        const DXT5 = 1 << 2;
        /// Use BC4 compression
        const BC4 = 1 << 3;
        /// Use BC5 compression
        const BC5 = 1 << 4;
        /// Use a slow but high quality colour compressor (the default)
        const COLOUR_CLUSTER_FIT = 1 << 5;
        /// Use a fast but low quality colour compressor
        const COLOUR_RANGE_FIT = 1 << 6;
        /// Weight the colour by alpha during cluster fit
        const WEIGHT_COLOUR_BY_ALPHA = 1 << 7;
        /// Use a very slow but very high quality colour compressor
        const COLOUR_ITERATIVE_CLUSTER_FIT = 1 << 8;
        /// Source is BGRA rather than RGBA
        const SOURCE_BGRA = 1 << 9;
    }
}

impl Flags {
    const FORMATS: Flags = Flags::DXT1
        .union(Flags::DXT3)
        .union(Flags::DXT5)
        .union(Flags::BC4)
        .union(Flags::BC5);

    const ALGORITHMS: Flags = Flags::COLOUR_CLUSTER_FIT
        .union(Flags::COLOUR_RANGE_FIT)
        .union(Flags::COLOUR_ITERATIVE_CLUSTER_FIT);

    /// The selected format. No format bit means DXT1.
    pub fn format(self) -> Result<Format, Error> {
        let formats = self & Self::FORMATS;
        if formats.is_empty() || formats == Flags::DXT1 {
            Ok(Format::Dxt1)
        } else if formats == Flags::DXT3 {
            Ok(Format::Dxt3)
        } else if formats == Flags::DXT5 {
            Ok(Format::Dxt5)
        } else if formats == Flags::BC4 {
            Ok(Format::Bc4)
        } else if formats == Flags::BC5 {
            Ok(Format::Bc5)
        } else {
            Err(Error::ConflictingFormats(formats))
        }
    }

    /// The selected colour fit. No fit bit means cluster fit.
    pub fn algorithm(self) -> Result<Algorithm, Error> {
        let algorithms = self & Self::ALGORITHMS;
        if algorithms.is_empty() || algorithms == Flags::COLOUR_CLUSTER_FIT {
            Ok(Algorithm::ClusterFit)
        } else if algorithms == Flags::COLOUR_RANGE_FIT {
            Ok(Algorithm::RangeFit)
        } else if algorithms == Flags::COLOUR_ITERATIVE_CLUSTER_FIT {
            Ok(Algorithm::IterativeClusterFit)
        } else {
            Err(Error::ConflictingAlgorithms(algorithms))
        }
    }

    pub fn order(self) -> PixelOrder {
        if self.contains(Flags::SOURCE_BGRA) {
            PixelOrder::Bgra
        } else {
            PixelOrder::Rgba
        }
    }

    /// Compressor parameters for these flags. A missing metric means uniform weights.
    pub fn params(self, metric: Option<ColourWeights>) -> Result<Params, Error> {
        Ok(Params {
            algorithm: self.algorithm()?,
            weights: metric.unwrap_or(COLOUR_WEIGHTS_UNIFORM),
            weigh_colour_by_alpha: self.contains(Flags::WEIGHT_COLOUR_BY_ALPHA),
            order: self.order(),
        })
    }
}

impl From<Format> for Flags {
    fn from(format: Format) -> Self {
        match format {
            Format::Dxt1 => Flags::DXT1,
            Format::Dxt3 => Flags::DXT3,
            Format::Dxt5 => Flags::DXT5,
            Format::Bc4 => Flags::BC4,
            Format::Bc5 => Flags::BC5,
        }
    }
}
