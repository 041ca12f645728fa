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

use crate::colourblock::{write_colour_block3, write_colour_block4};
use crate::colourfit::{metric_from_weights, BestFit, ColourFitImpl};
use crate::colourset::ColourSet;
use crate::f32_to_i32_clamped;
use crate::math::Vec3;
use crate::ColourWeights;

/// Quantised endpoints reproducing one channel value, and how far off they are
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SourceBlock {
    start: u8,
    end: u8,
    error: u8,
}

/// Bit replication from a 5 or 6 bit level to 8 bits
fn expand(level: u8, bits: u32) -> i32 {
    let level = level as i32;
    (level << (8 - bits)) | (level >> (2 * bits - 8))
}

/// Finds the endpoints that best reproduce `value` as palette entry 0 (the
/// endpoint itself) and as palette entry 2 (the first interpolant), using the
/// decoder's integer arithmetic.
fn lookup(value: u8, bits: u32, four_colour: bool) -> [SourceBlock; 2] {
    let levels = 1u8 << bits;
    let value = value as i32;

    let mut exact = SourceBlock {
        error: u8::MAX,
        ..Default::default()
    };
    for level in 0..levels {
        let error = (expand(level, bits) - value).abs();
        if error < exact.error as i32 {
            exact = SourceBlock {
                start: level,
                end: level,
                error: error as u8,
            };
        }
    }

    let mut interpolated = SourceBlock {
        error: u8::MAX,
        ..Default::default()
    };
    for start in 0..levels {
        let s = expand(start, bits);
        for end in 0..levels {
            let e = expand(end, bits);
            let decoded = if four_colour { (2 * s + e) / 3 } else { (s + e) / 2 };
            let error = (decoded - value).abs();
            if error < interpolated.error as i32 {
                interpolated = SourceBlock {
                    start,
                    end,
                    error: error as u8,
                };
            }
        }
    }

    [exact, interpolated]
}

/// Fit for blocks containing a single colour.
pub struct SingleColourFit<'a> {
    colours: &'a ColourSet,
    is_bc1: bool,
    metric: Vec3,
    colour: [u8; 3],
    start: Vec3,
    end: Vec3,
    index: u8,
    error: f32,
    best: BestFit,
}

impl<'a> SingleColourFit<'a> {
    pub fn new(colours: &'a ColourSet, is_bc1: bool, weights: ColourWeights) -> Self {
        let point = colours.points().first().copied().unwrap_or_default();
        let colour = [
            f32_to_i32_clamped(255.0 * point.x, 255) as u8,
            f32_to_i32_clamped(255.0 * point.y, 255) as u8,
            f32_to_i32_clamped(255.0 * point.z, 255) as u8,
        ];

        SingleColourFit {
            colours,
            is_bc1,
            metric: metric_from_weights(weights),
            colour,
            start: Vec3::default(),
            end: Vec3::default(),
            index: 0,
            error: f32::MAX,
            best: BestFit::default(),
        }
    }

    fn compute_end_points(&mut self, four_colour: bool) {
        const BITS: [u32; 3] = [5, 6, 5];

        let sources: [[SourceBlock; 2]; 3] =
            core::array::from_fn(|c| lookup(self.colour[c], BITS[c], four_colour));
        let weight: f32 = self.colours.weights().iter().sum();
        let metric = [self.metric.x, self.metric.y, self.metric.z];

        self.error = f32::MAX;
        for index in 0..2 {
            let mut error = 0.0;
            for c in 0..3 {
                let diff = sources[c][index].error as f32 / 255.0;
                error += metric[c] * diff * diff * weight;
            }

            if error < self.error {
                let level = |c: usize, end: bool| {
                    let source = sources[c][index];
                    (if end { source.end } else { source.start }) as f32
                };
                self.start = Vec3::new(
                    level(0, false) / 31.0,
                    level(1, false) / 63.0,
                    level(2, false) / 31.0,
                );
                self.end = Vec3::new(
                    level(0, true) / 31.0,
                    level(1, true) / 63.0,
                    level(2, true) / 31.0,
                );
                self.index = 2 * index as u8;
                self.error = error;
            }
        }
    }
}

impl<'a> ColourFitImpl for SingleColourFit<'a> {
    fn is_bc1(&self) -> bool {
        self.is_bc1
    }

    fn is_transparent(&self) -> bool {
        self.colours.is_transparent()
    }

    fn compress3(&mut self) {
        self.compute_end_points(false);
        if self.error < self.best.error {
            let indices = self.colours.remap_indices(&[self.index]);
            write_colour_block3(self.start, self.end, &indices, &mut self.best.block);
            self.best.error = self.error;
        }
    }

    fn compress4(&mut self) {
        self.compute_end_points(true);
        if self.error < self.best.error {
            let indices = self.colours.remap_indices(&[self.index]);
            write_colour_block4(self.start, self.end, &indices, &mut self.best.block);
            self.best.error = self.error;
        }
    }

    fn best(&self) -> &BestFit {
        &self.best
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------
