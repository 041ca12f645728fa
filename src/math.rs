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

use core::ops::{Add, AddAssign, Mul, Sub};

/// Number of power iterations used to find the principal axis
const POWER_ITERATION_COUNT: usize = 8;

/// Quantisation grid of a 5:6:5 colour
pub const GRID: Vec3 = Vec3::new(31.0, 63.0, 31.0);

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Vec3 { x: v, y: v, z: v }
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Component-wise minimum
    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum
    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    pub fn clamp01(self) -> Vec3 {
        self.max(Vec3::splat(0.0)).min(Vec3::splat(1.0))
    }

    pub fn truncate(self) -> Vec3 {
        Vec3::new(libm::truncf(self.x), libm::truncf(self.y), libm::truncf(self.z))
    }

    /// Clamps to [0, 1] and snaps each channel to the nearest 5:6:5 level.
    pub fn snap_to_grid(self) -> Vec3 {
        let snapped = (GRID * self.clamp01() + Vec3::splat(0.5)).truncate();
        Vec3::new(snapped.x / GRID.x, snapped.y / GRID.y, snapped.z / GRID.z)
    }

    /// Squared length with every channel weighted by `metric`.
    pub fn weighted_length_sq(self, metric: Vec3) -> f32 {
        (self * self).dot(metric)
    }

    pub fn max_abs_component(self) -> f32 {
        let mut m = self.x;
        if libm::fabsf(self.y) > libm::fabsf(m) {
            m = self.y;
        }
        if libm::fabsf(self.z) > libm::fabsf(m) {
            m = self.z;
        }
        m
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A colour point with its weight in `w`, as accumulated by the cluster fit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Vec4 { x, y, z, w }
    }

    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    fn add(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl AddAssign for Vec4 {
    fn add_assign(&mut self, rhs: Vec4) {
        *self = *self + rhs;
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl Mul for Vec4 {
    type Output = Vec4;
    fn mul(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z, self.w * rhs.w)
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    fn mul(self, rhs: f32) -> Vec4 {
        Vec4::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

/// Upper triangle of a symmetric 3x3 matrix, row by row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sym3x3([f32; 6]);

impl Sym3x3 {
    /// Weighted covariance of `points` around their weighted centroid.
    pub fn weighted_covariance(points: &[Vec3], weights: &[f32]) -> Sym3x3 {
        let mut total = 0.0;
        let mut centroid = Vec3::default();
        for (&p, &w) in points.iter().zip(weights) {
            total += w;
            centroid += p * w;
        }
        if total > f32::EPSILON {
            centroid = centroid * (1.0 / total);
        }

        let mut m = [0.0f32; 6];
        for (&p, &w) in points.iter().zip(weights) {
            let a = p - centroid;
            let b = a * w;
            m[0] += a.x * b.x;
            m[1] += a.x * b.y;
            m[2] += a.x * b.z;
            m[3] += a.y * b.y;
            m[4] += a.y * b.z;
            m[5] += a.z * b.z;
        }
        Sym3x3(m)
    }

    fn mul_vec(&self, v: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[1] * v.x + m[3] * v.y + m[4] * v.z,
            m[2] * v.x + m[4] * v.y + m[5] * v.z,
        )
    }

    /// Dominant eigenvector via power iteration. The result is scaled so that
    /// its largest component is 1 and is not unit length.
    pub fn principle_component(&self) -> Vec3 {
        let mut v = Vec3::splat(1.0);
        for _ in 0..POWER_ITERATION_COUNT {
            let w = self.mul_vec(v);
            let scale = w.max_abs_component();
            if libm::fabsf(scale) <= f32::EPSILON {
                // zero covariance, any axis will do
                break;
            }
            v = w * (1.0 / scale);
        }
        v
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------
