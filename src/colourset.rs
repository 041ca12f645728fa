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

use crate::math::Vec3;

/// Pixels with alpha below this decode as transparent in BC1's 3-colour mode
const BC1_ALPHA_THRESHOLD: u8 = 128;

/// The distinct colours of a 4x4 block, weighted by how often they occur.
pub struct ColourSet {
    count: usize,
    points: [Vec3; 16],
    weights: [f32; 16],
    remap: [Option<u8>; 16],
    transparent: bool,
}

impl ColourSet {
    /// Builds the minimal point set of a block.
    ///
    /// * `rgba`           - The block of pixels
    /// * `mask`           - Pixels whose bit is clear are ignored
    /// * `is_bc1`         - Whether pixels below the alpha threshold punch through
    /// * `weigh_by_alpha` - Scale each pixel's weight by its alpha
    pub fn new(rgba: &[[u8; 4]; 16], mask: u32, is_bc1: bool, weigh_by_alpha: bool) -> Self {
        let mut set = ColourSet {
            count: 0,
            points: [Vec3::default(); 16],
            weights: [0.0; 16],
            remap: [None; 16],
            transparent: false,
        };

        for i in 0..16 {
            if mask & (1 << i) == 0 {
                continue;
            }

            let pixel = rgba[i];
            if is_bc1 && pixel[3] < BC1_ALPHA_THRESHOLD {
                set.transparent = true;
                continue;
            }

            // never zero, so fully transparent pixels keep the system solvable
            let weight = if weigh_by_alpha {
                (pixel[3] as f32 + 1.0) / 256.0
            } else {
                1.0
            };

            // merge with an earlier pixel of the same colour
            let existing = (0..i).find_map(|j| match set.remap[j] {
                Some(index) if rgba[j][..3] == pixel[..3] => Some(index),
                _ => None,
            });

            match existing {
                Some(index) => {
                    set.weights[index as usize] += weight;
                    set.remap[i] = Some(index);
                }
                None => {
                    set.points[set.count] = Vec3::new(
                        pixel[0] as f32 / 255.0,
                        pixel[1] as f32 / 255.0,
                        pixel[2] as f32 / 255.0,
                    );
                    set.weights[set.count] = weight;
                    set.remap[i] = Some(set.count as u8);
                    set.count += 1;
                }
            }
        }

        set
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.count]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights[..self.count]
    }

    /// Whether any pixel was excluded as BC1 punch-through alpha
    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Expands per-point indices to per-pixel indices. Pixels outside the
    /// set get index 3, the transparent entry of a 3-colour palette.
    pub fn remap_indices(&self, source: &[u8]) -> [u8; 16] {
        let mut target = [3u8; 16];
        for (t, r) in target.iter_mut().zip(self.remap) {
            if let Some(index) = r {
                *t = source[index as usize];
            }
        }
        target
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn block_of(pixels: &[[u8; 4]]) -> [[u8; 4]; 16] {
        let mut rgba = [[0u8; 4]; 16];
        for (i, p) in rgba.iter_mut().enumerate() {
            *p = pixels[i % pixels.len()];
        }
        rgba
    }

    #[test]
    fn test_duplicates_merge_in_first_occurrence_order() {
        let rgba = block_of(&[[10, 20, 30, 255], [200, 100, 0, 255], [10, 20, 30, 255]]);
        let set = ColourSet::new(&rgba, 0xFFFF, false, false);

        assert_eq!(set.count(), 2);
        assert_eq!(set.points()[0], Vec3::new(10.0 / 255.0, 20.0 / 255.0, 30.0 / 255.0));
        // 16 pixels cycling through three entries, two of which are equal
        assert_eq!(set.weights(), &[11.0, 5.0]);
        assert!(!set.is_transparent());
    }

    #[test]
    fn test_weight_sum_matches_pixel_weights() {
        let rgba = block_of(&[[1, 2, 3, 0], [1, 2, 3, 255], [9, 9, 9, 127], [4, 4, 4, 63]]);
        let set = ColourSet::new(&rgba, 0xFFFF, false, true);

        let expected: f32 = rgba.iter().map(|p| (p[3] as f32 + 1.0) / 256.0).sum();
        let actual: f32 = set.weights().iter().sum();
        assert!(libm::fabsf(expected - actual) < 1e-5);
        assert_eq!(set.count(), 3);
    }

    #[test]
    fn test_bc1_punch_through_excludes_pixels() {
        let rgba = block_of(&[[255, 0, 0, 255], [0, 255, 0, 0]]);
        let set = ColourSet::new(&rgba, 0xFFFF, true, false);
        assert_eq!(set.count(), 1);
        assert!(set.is_transparent());

        let indices = set.remap_indices(&[2]);
        for (i, index) in indices.iter().enumerate() {
            assert_eq!(*index, if i % 2 == 0 { 2 } else { 3 });
        }

        // other formats keep every pixel
        let set = ColourSet::new(&rgba, 0xFFFF, false, false);
        assert_eq!(set.count(), 2);
        assert!(!set.is_transparent());
    }

    #[test]
    fn test_mask_excludes_pixels() {
        let rgba = block_of(&[[255, 0, 0, 255], [0, 0, 255, 255]]);
        let set = ColourSet::new(&rgba, 0x5555, false, false);
        assert_eq!(set.count(), 1);
        assert_eq!(set.weights(), &[8.0]);
    }
}
