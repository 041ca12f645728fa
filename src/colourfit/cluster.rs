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
use crate::math::{Sym3x3, Vec3, Vec4};
use crate::ColourWeights;

/// Upper bound on the orderings tried by the iterative cluster fit
const MAX_ITERATIONS: usize = 8;

/// Partitions whose least squares determinant falls below this fraction of
/// `alpha2_sum * beta2_sum` put every point at the same interpolant.
const SINGULAR_THRESHOLD: f32 = 1e-5;

const HALF_HALF2: Vec4 = Vec4::new(0.5, 0.5, 0.5, 0.25);
const ONETHIRD_ONETHIRD2: Vec4 = Vec4::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 9.0);
const TWOTHIRDS_TWOTHIRDS2: Vec4 = Vec4::new(2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 4.0 / 9.0);

/// Least squares endpoints and their error for one partition.
struct Candidate {
    start: Vec3,
    end: Vec3,
    error: f32,
}

/// Exhaustive search over the orderings of the colour set along an axis.
pub struct ClusterFit<'a> {
    colours: &'a ColourSet,
    is_bc1: bool,
    iteration_count: usize,
    metric: Vec3,
    principle: Vec3,
    order: [[u8; 16]; MAX_ITERATIONS],
    points_weights: [Vec4; 16],
    xsum_wsum: Vec4,
    xxsum: f32,
    best: BestFit,
}

impl<'a> ClusterFit<'a> {
    /// * `colours` - The colour set to fit
    /// * `is_bc1`  - Whether the 3-colour palette may be used
    /// * `weights` - Per-channel error weights
    /// * `iterate` - Re-sort along the best endpoints and search again
    pub fn new(
        colours: &'a ColourSet,
        is_bc1: bool,
        weights: ColourWeights,
        iterate: bool,
    ) -> Self {
        let metric = metric_from_weights(weights);
        let principle =
            Sym3x3::weighted_covariance(colours.points(), colours.weights()).principle_component();

        // constant part of the error, identical for every partition
        let xxsum = colours
            .points()
            .iter()
            .zip(colours.weights())
            .map(|(&p, &w)| (p * p).dot(metric) * w)
            .sum();

        ClusterFit {
            colours,
            is_bc1,
            iteration_count: if iterate { MAX_ITERATIONS } else { 1 },
            metric,
            principle,
            order: [[0; 16]; MAX_ITERATIONS],
            points_weights: [Vec4::default(); 16],
            xsum_wsum: Vec4::default(),
            xxsum,
            best: BestFit::default(),
        }
    }

    /// Starts the search from a block found by another fit, which is only
    /// replaced by a strictly better one.
    pub fn seeded(mut self, best: BestFit) -> Self {
        self.best = best;
        self
    }

    /// Sorts the points along `axis` and caches the weighted points in that
    /// order. Returns false if the ordering was already tried.
    fn construct_ordering(&mut self, axis: Vec3, iteration: usize) -> bool {
        let points = self.colours.points();
        let count = points.len();

        let mut dps = [0.0f32; 16];
        let mut order = [0u8; 16];
        for (i, &point) in points.iter().enumerate() {
            dps[i] = point.dot(axis);
            order[i] = i as u8;
        }

        // stable insertion sort
        for i in 0..count {
            let mut j = i;
            while j > 0 && dps[j] < dps[j - 1] {
                dps.swap(j, j - 1);
                order.swap(j, j - 1);
                j -= 1;
            }
        }

        if self.order[..iteration]
            .iter()
            .any(|prev| prev[..count] == order[..count])
        {
            return false;
        }
        self.order[iteration] = order;

        let weights = self.colours.weights();
        self.xsum_wsum = Vec4::default();
        for (i, &j) in order[..count].iter().enumerate() {
            let p = points[j as usize];
            let x = Vec4::new(p.x, p.y, p.z, 1.0) * weights[j as usize];
            self.points_weights[i] = x;
            self.xsum_wsum += x;
        }
        true
    }

    /// Solves for the endpoints of one partition, snaps them to the 5:6:5 grid
    /// and scores the result.
    fn solve(&self, alphax_sum: Vec4, betax_sum: Vec4, alphabeta_sum: f32) -> Option<Candidate> {
        let alpha2_sum = alphax_sum.w;
        let beta2_sum = betax_sum.w;

        let det = alpha2_sum * beta2_sum - alphabeta_sum * alphabeta_sum;
        if det <= SINGULAR_THRESHOLD * alpha2_sum * beta2_sum {
            return None;
        }
        let factor = 1.0 / det;

        let ax = alphax_sum.xyz();
        let bx = betax_sum.xyz();
        let start = ((ax * beta2_sum - bx * alphabeta_sum) * factor).snap_to_grid();
        let end = ((bx * alpha2_sum - ax * alphabeta_sum) * factor).snap_to_grid();

        // sum of w * |alpha * start + beta * end - x|^2, expanded
        let e1 = start * start * alpha2_sum + end * end * beta2_sum;
        let e2 = start * end * alphabeta_sum - start * ax - end * bx;
        let error = (e2 * 2.0 + e1).dot(self.metric) + self.xxsum;

        Some(Candidate { start, end, error })
    }

    fn write_best(
        &mut self,
        candidate: Candidate,
        iteration: usize,
        boundaries: &[(usize, u8)],
        four_colour: bool,
    ) {
        let count = self.colours.count();
        let order = &self.order[iteration];

        // each boundary closes the run of points that share an index
        let mut unordered = [0u8; 16];
        let mut first = 0;
        for &(last, index) in boundaries.iter().chain([(count, 1u8)].iter()) {
            for &point in &order[first..last] {
                unordered[point as usize] = index;
            }
            first = last;
        }

        let indices = self.colours.remap_indices(&unordered);
        if four_colour {
            write_colour_block4(candidate.start, candidate.end, &indices, &mut self.best.block);
        } else {
            write_colour_block3(candidate.start, candidate.end, &indices, &mut self.best.block);
        }
        self.best.error = candidate.error;
    }

    /// Re-sorts along the best endpoints found so far. Returns false if the
    /// search should stop.
    fn next_ordering(&mut self, start: Vec3, end: Vec3, iteration: usize) -> bool {
        if iteration >= self.iteration_count {
            return false;
        }
        let axis = end - start;
        if axis == Vec3::default() {
            return false;
        }
        self.construct_ordering(axis, iteration)
    }
}

impl<'a> ColourFitImpl for ClusterFit<'a> {
    fn is_bc1(&self) -> bool {
        self.is_bc1
    }

    fn is_transparent(&self) -> bool {
        self.colours.is_transparent()
    }

    fn compress3(&mut self) {
        let count = self.colours.count();
        if count == 0 || !self.construct_ordering(self.principle, 0) {
            return;
        }

        let mut best: Option<(Candidate, usize, [usize; 2])> = None;
        let mut best_error = self.best.error;

        let mut iteration = 0;
        loop {
            let mut improved = false;

            // first cluster [0,i) is at the start
            let mut part0 = Vec4::default();
            for i in 0..count {
                // second cluster [i,j) is half along
                let mut part1 = if i == 0 {
                    self.points_weights[0]
                } else {
                    Vec4::default()
                };
                let mut j = if i == 0 { 1 } else { i };
                loop {
                    // last cluster [j,count) is at the end
                    let part2 = self.xsum_wsum - part1 - part0;

                    let alphax_sum = part0 + part1 * HALF_HALF2;
                    let betax_sum = part2 + part1 * HALF_HALF2;
                    let alphabeta_sum = 0.25 * part1.w;

                    if let Some(candidate) = self.solve(alphax_sum, betax_sum, alphabeta_sum) {
                        if candidate.error < best_error {
                            best_error = candidate.error;
                            best = Some((candidate, iteration, [i, j]));
                            improved = true;
                        }
                    }

                    if j == count {
                        break;
                    }
                    part1 += self.points_weights[j];
                    j += 1;
                }

                part0 += self.points_weights[i];
            }

            iteration += 1;
            let Some((candidate, _, _)) = best.as_ref().filter(|_| improved) else {
                break;
            };
            let (start, end) = (candidate.start, candidate.end);
            if !self.next_ordering(start, end, iteration) {
                break;
            }
        }

        if let Some((candidate, iteration, [i, j])) = best {
            self.write_best(candidate, iteration, &[(i, 0), (j, 2)], false);
        }
    }

    fn compress4(&mut self) {
        let count = self.colours.count();
        if count == 0 || !self.construct_ordering(self.principle, 0) {
            return;
        }

        let mut best: Option<(Candidate, usize, [usize; 3])> = None;
        let mut best_error = self.best.error;

        let mut iteration = 0;
        loop {
            let mut improved = false;

            // first cluster [0,i) is at the start
            let mut part0 = Vec4::default();
            for i in 0..count {
                // second cluster [i,j) is one third along
                let mut part1 = Vec4::default();
                let mut j = i;
                loop {
                    // third cluster [j,k) is two thirds along
                    let mut part2 = if j == 0 {
                        self.points_weights[0]
                    } else {
                        Vec4::default()
                    };
                    let mut k = if j == 0 { 1 } else { j };
                    loop {
                        // last cluster [k,count) is at the end
                        let part3 = self.xsum_wsum - part2 - part1 - part0;

                        let alphax_sum =
                            part0 + part1 * TWOTHIRDS_TWOTHIRDS2 + part2 * ONETHIRD_ONETHIRD2;
                        let betax_sum =
                            part3 + part2 * TWOTHIRDS_TWOTHIRDS2 + part1 * ONETHIRD_ONETHIRD2;
                        let alphabeta_sum = 2.0 / 9.0 * (part1.w + part2.w);

                        if let Some(candidate) = self.solve(alphax_sum, betax_sum, alphabeta_sum)
                        {
                            if candidate.error < best_error {
                                best_error = candidate.error;
                                best = Some((candidate, iteration, [i, j, k]));
                                improved = true;
                            }
                        }

                        if k == count {
                            break;
                        }
                        part2 += self.points_weights[k];
                        k += 1;
                    }

                    if j == count {
                        break;
                    }
                    part1 += self.points_weights[j];
                    j += 1;
                }

                part0 += self.points_weights[i];
            }

            iteration += 1;
            let Some((candidate, _, _)) = best.as_ref().filter(|_| improved) else {
                break;
            };
            let (start, end) = (candidate.start, candidate.end);
            if !self.next_ordering(start, end, iteration) {
                break;
            }
        }

        if let Some((candidate, iteration, [i, j, k])) = best {
            self.write_best(candidate, iteration, &[(i, 0), (j, 2), (k, 3)], true);
        }
    }

    fn best(&self) -> &BestFit {
        &self.best
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------
