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
use crate::math::{Sym3x3, Vec3};
use crate::ColourWeights;

type WriteBlock = fn(Vec3, Vec3, &[u8; 16], &mut [u8]);

/// Endpoints at the extremes of the colour set along its principal axis.
pub struct RangeFit<'a> {
    colours: &'a ColourSet,
    is_bc1: bool,
    metric: Vec3,
    start: Vec3,
    end: Vec3,
    best: BestFit,
}

impl<'a> RangeFit<'a> {
    pub fn new(colours: &'a ColourSet, is_bc1: bool, weights: ColourWeights) -> Self {
        let points = colours.points();
        let principle =
            Sym3x3::weighted_covariance(points, colours.weights()).principle_component();

        // get the min and max range as the codebook endpoints
        let mut start = Vec3::default();
        let mut end = Vec3::default();
        if let Some((&first, rest)) = points.split_first() {
            start = first;
            end = first;
            let mut min = first.dot(principle);
            let mut max = min;
            for &point in rest {
                let val = point.dot(principle);
                if val < min {
                    start = point;
                    min = val;
                } else if val > max {
                    end = point;
                    max = val;
                }
            }
        }

        RangeFit {
            colours,
            is_bc1,
            metric: metric_from_weights(weights),
            start: start.snap_to_grid(),
            end: end.snap_to_grid(),
            best: BestFit::default(),
        }
    }

    fn fit_codes(&mut self, codes: &[Vec3], write: WriteBlock) {
        let mut closest = [0u8; 16];
        let mut error = 0.0;

        for ((&point, &weight), index) in self
            .colours
            .points()
            .iter()
            .zip(self.colours.weights())
            .zip(closest.iter_mut())
        {
            let mut dist = f32::MAX;
            for (j, &code) in codes.iter().enumerate() {
                let d = (point - code).weighted_length_sq(self.metric);
                if d < dist {
                    dist = d;
                    *index = j as u8;
                }
            }
            error += dist * weight;
        }

        if error < self.best.error {
            let indices = self.colours.remap_indices(&closest);
            write(self.start, self.end, &indices, &mut self.best.block);
            self.best.error = error;
        }
    }
}

impl<'a> ColourFitImpl for RangeFit<'a> {
    fn is_bc1(&self) -> bool {
        self.is_bc1
    }

    fn is_transparent(&self) -> bool {
        self.colours.is_transparent()
    }

    fn compress3(&mut self) {
        let codes = [self.start, self.end, self.start * 0.5 + self.end * 0.5];
        self.fit_codes(&codes, write_colour_block3);
    }

    fn compress4(&mut self) {
        let codes = [
            self.start,
            self.end,
            self.start * (2.0 / 3.0) + self.end * (1.0 / 3.0),
            self.start * (1.0 / 3.0) + self.end * (2.0 / 3.0),
        ];
        self.fit_codes(&codes, write_colour_block4);
    }

    fn best(&self) -> &BestFit {
        &self.best
    }
}
