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

mod cluster;
mod range;
mod single;

pub use self::cluster::ClusterFit;
pub use self::range::RangeFit;
pub use self::single::SingleColourFit;

use crate::math::Vec3;
use crate::ColourWeights;

/// The lowest-error colour block found so far.
///
/// Errors are the metric-weighted squared distance in [0, 1] colour space,
/// summed over the weighted points of the colour set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestFit {
    pub error: f32,
    pub block: [u8; 8],
}

impl Default for BestFit {
    fn default() -> Self {
        BestFit {
            error: f32::MAX,
            block: [0; 8],
        }
    }
}

pub trait ColourFit {
    fn compress(&mut self, block: &mut [u8]);
}

pub trait ColourFitImpl {
    fn is_bc1(&self) -> bool;
    fn is_transparent(&self) -> bool;
    fn compress3(&mut self);
    fn compress4(&mut self);
    fn best(&self) -> &BestFit;
}

impl<T> ColourFit for T
where
    T: ColourFitImpl,
{
    fn compress(&mut self, block: &mut [u8]) {
        if self.is_bc1() {
            self.compress3();
            if !self.is_transparent() {
                self.compress4();
            }
        } else {
            self.compress4();
        }

        block.copy_from_slice(&self.best().block);
    }
}

fn metric_from_weights(weights: ColourWeights) -> Vec3 {
    Vec3::new(weights[0], weights[1], weights[2])
}
