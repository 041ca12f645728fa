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

//! Packing and unpacking of the 8-byte colour block shared by BC1, BC2 and BC3.

use crate::f32_to_i32_clamped;
use crate::math::Vec3;

/// Quantises a colour in [0, 1] to 5:6:5
fn float_to_565(colour: Vec3) -> u16 {
    let r = f32_to_i32_clamped(31.0 * colour.x, 31) as u16;
    let g = f32_to_i32_clamped(63.0 * colour.y, 63) as u16;
    let b = f32_to_i32_clamped(31.0 * colour.z, 31) as u16;
    (r << 11) | (g << 5) | b
}

fn write_colour_block(a: u16, b: u16, indices: &[u8; 16], block: &mut [u8]) {
    block[0..2].copy_from_slice(&a.to_le_bytes());
    block[2..4].copy_from_slice(&b.to_le_bytes());

    // one byte per row, first pixel in the lowest bits
    for (row, packed) in indices.chunks_exact(4).zip(block[4..8].iter_mut()) {
        *packed = row[0] | (row[1] << 2) | (row[2] << 4) | (row[3] << 6);
    }
}

/// Writes a 3-colour block. Index 0 is `start`, 1 is `end`, 2 the midpoint
/// and 3 transparent black.
pub fn write_colour_block3(start: Vec3, end: Vec3, indices: &[u8; 16], block: &mut [u8]) {
    let mut a = float_to_565(start);
    let mut b = float_to_565(end);

    // 3-colour mode requires a <= b
    let mut remapped = *indices;
    if a > b {
        core::mem::swap(&mut a, &mut b);
        for index in remapped.iter_mut() {
            *index = match *index {
                0 => 1,
                1 => 0,
                other => other,
            };
        }
    }

    write_colour_block(a, b, &remapped, block);
}

/// Writes a 4-colour block. Index 0 is `start`, 1 is `end`, 2 and 3 the
/// points one and two thirds of the way from `start` to `end`.
pub fn write_colour_block4(start: Vec3, end: Vec3, indices: &[u8; 16], block: &mut [u8]) {
    let mut a = float_to_565(start);
    let mut b = float_to_565(end);

    // 4-colour mode requires a > b
    let mut remapped = *indices;
    if a < b {
        core::mem::swap(&mut a, &mut b);
        for index in remapped.iter_mut() {
            *index ^= 0x1;
        }
    } else if a == b {
        remapped = [0; 16];
    }

    write_colour_block(a, b, &remapped, block);
}

/// Expands a 5:6:5 colour to 8 bits per channel by bit replication
pub fn unpack_565(packed: u16) -> [u8; 4] {
    let r = ((packed >> 11) & 0x1f) as u8;
    let g = ((packed >> 5) & 0x3f) as u8;
    let b = (packed & 0x1f) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2), 255]
}

/// Decompresses an 8-byte colour block
///
/// * `block`  - The compressed colour block
/// * `is_bc1` - Whether `endpoint0 <= endpoint1` selects the 3-colour palette
pub fn decompress(block: &[u8], is_bc1: bool) -> [[u8; 4]; 16] {
    let a = u16::from_le_bytes([block[0], block[1]]);
    let b = u16::from_le_bytes([block[2], block[3]]);

    let mut codes = [[0u8; 4]; 4];
    codes[0] = unpack_565(a);
    codes[1] = unpack_565(b);

    let three_colour = is_bc1 && a <= b;
    for i in 0..3 {
        let c = codes[0][i] as u32;
        let d = codes[1][i] as u32;
        if three_colour {
            codes[2][i] = ((c + d) / 2) as u8;
            codes[3][i] = 0;
        } else {
            codes[2][i] = ((2 * c + d) / 3) as u8;
            codes[3][i] = ((c + 2 * d) / 3) as u8;
        }
    }
    codes[2][3] = 255;
    codes[3][3] = if three_colour { 0 } else { 255 };

    let mut rgba = [[0u8; 4]; 16];
    for (i, pixel) in rgba.iter_mut().enumerate() {
        let index = (block[4 + i / 4] >> (2 * (i % 4))) & 0x3;
        *pixel = codes[index as usize];
    }
    rgba
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------
