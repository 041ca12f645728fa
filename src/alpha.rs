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

//! Single channel block codecs: the explicit 4-bit alpha of BC2 and the
//! interpolated alpha of BC3, which BC4 and BC5 reuse for arbitrary channels.

/// Compresses the alpha channel of a block into BC2's explicit 4-bit layout.
/// Masked out pixels are stored as zero.
pub fn compress_bc2(rgba: &[[u8; 4]; 16], mask: u32, block: &mut [u8]) {
    for (i, byte) in block[..8].iter_mut().enumerate() {
        let mut nibbles = [0u8; 2];
        for (j, nibble) in nibbles.iter_mut().enumerate() {
            let pixel = 2 * i + j;
            if mask & (1 << pixel) != 0 {
                *nibble = rgba[pixel][3] >> 4;
            }
        }
        *byte = nibbles[0] | (nibbles[1] << 4);
    }
}

pub fn decompress_bc2(rgba: &mut [[u8; 4]; 16], block: &[u8]) {
    for (i, &byte) in block[..8].iter().enumerate() {
        let lo = byte & 0x0f;
        let hi = byte & 0xf0;
        rgba[2 * i][3] = lo | (lo << 4);
        rgba[2 * i + 1][3] = hi | (hi >> 4);
    }
}

/// Widens `[min, max]` until it spans at least `steps`, staying inside 0..=255
fn fix_range(min: &mut i32, max: &mut i32, steps: i32) {
    if *max - *min < steps {
        *max = (*min + steps).min(255);
    }
    if *max - *min < steps {
        *min = (*max - steps).max(0);
    }
}

/// Assigns every valid pixel its nearest code, returning the squared error
fn fit_codes(values: &[u8; 16], mask: u32, codes: &[u8; 8], indices: &mut [u8; 16]) -> i32 {
    let mut error = 0;
    for (i, &value) in values.iter().enumerate() {
        if mask & (1 << i) == 0 {
            indices[i] = 0;
            continue;
        }

        let mut least = i32::MAX;
        let mut index = 0;
        for (j, &code) in codes.iter().enumerate() {
            let dist = (value as i32 - code as i32).pow(2);
            if dist < least {
                least = dist;
                index = j as u8;
            }
        }
        indices[i] = index;
        error += least;
    }
    error
}

fn write_alpha_block(alpha0: u8, alpha1: u8, indices: &[u8; 16], block: &mut [u8]) {
    block[0] = alpha0;
    block[1] = alpha1;

    // two groups of eight 3-bit indices, 24 bits little endian each
    for (src, dest) in indices.chunks_exact(8).zip(block[2..8].chunks_exact_mut(3)) {
        let packed = src
            .iter()
            .enumerate()
            .fold(0u32, |acc, (j, &index)| acc | ((index as u32) << (3 * j)));
        dest.copy_from_slice(&packed.to_le_bytes()[..3]);
    }
}

/// Writes a block using the palette with 4 interpolated values plus 0 and 255
fn write_alpha_block5(alpha0: u8, alpha1: u8, indices: &[u8; 16], block: &mut [u8]) {
    if alpha0 > alpha1 {
        let mut swapped = [0u8; 16];
        for (s, &index) in swapped.iter_mut().zip(indices) {
            *s = match index {
                0 => 1,
                1 => 0,
                2..=5 => 7 - index,
                _ => index,
            };
        }
        write_alpha_block(alpha1, alpha0, &swapped, block);
    } else {
        write_alpha_block(alpha0, alpha1, indices, block);
    }
}

/// Writes a block using the palette with 6 interpolated values
fn write_alpha_block7(alpha0: u8, alpha1: u8, indices: &[u8; 16], block: &mut [u8]) {
    if alpha0 < alpha1 {
        let mut swapped = [0u8; 16];
        for (s, &index) in swapped.iter_mut().zip(indices) {
            *s = match index {
                0 => 1,
                1 => 0,
                _ => 9 - index,
            };
        }
        write_alpha_block(alpha1, alpha0, &swapped, block);
    } else {
        write_alpha_block(alpha0, alpha1, indices, block);
    }
}

/// Compresses one channel of a block into BC3's interpolated alpha layout.
///
/// * `rgba`    - The block of pixels
/// * `channel` - Which channel to compress (3 for alpha, 0 or 1 for BC4/BC5)
/// * `mask`    - The valid pixel mask
/// * `block`   - Storage for the 8-byte block
pub fn compress_bc3(rgba: &[[u8; 4]; 16], channel: usize, mask: u32, block: &mut [u8]) {
    let mut values = [0u8; 16];
    for (value, pixel) in values.iter_mut().zip(rgba) {
        *value = pixel[channel];
    }

    // get the range for 5-alpha and 7-alpha interpolation
    let mut min5 = 255;
    let mut max5 = 0;
    let mut min7 = 255;
    let mut max7 = 0;
    for (i, &value) in values.iter().enumerate() {
        if mask & (1 << i) == 0 {
            continue;
        }
        let value = value as i32;
        min7 = min7.min(value);
        max7 = max7.max(value);
        if value != 0 {
            min5 = min5.min(value);
        }
        if value != 255 {
            max5 = max5.max(value);
        }
    }

    // uniform blocks are stored exactly with collapsed endpoints
    if min7 == max7 {
        write_alpha_block(min7 as u8, max7 as u8, &[0; 16], block);
        return;
    }
    if min7 > max7 {
        // nothing valid in the block
        write_alpha_block(0, 0, &[0; 16], block);
        return;
    }

    // only 0 and 255 present
    if min5 > max5 {
        min5 = max5;
    }

    fix_range(&mut min5, &mut max5, 5);
    fix_range(&mut min7, &mut max7, 7);

    let mut codes5 = [0u8; 8];
    codes5[0] = min5 as u8;
    codes5[1] = max5 as u8;
    for i in 1..5 {
        codes5[1 + i] = (((5 - i as i32) * min5 + i as i32 * max5) / 5) as u8;
    }
    codes5[6] = 0;
    codes5[7] = 255;

    let mut codes7 = [0u8; 8];
    codes7[0] = min7 as u8;
    codes7[1] = max7 as u8;
    for i in 1..7 {
        codes7[1 + i] = (((7 - i as i32) * min7 + i as i32 * max7) / 7) as u8;
    }

    let mut indices5 = [0u8; 16];
    let mut indices7 = [0u8; 16];
    let err5 = fit_codes(&values, mask, &codes5, &mut indices5);
    let err7 = fit_codes(&values, mask, &codes7, &mut indices7);

    // ties go to the ascending (0 and 255 reserving) encoding
    if err5 <= err7 {
        write_alpha_block5(min5 as u8, max5 as u8, &indices5, block);
    } else {
        write_alpha_block7(min7 as u8, max7 as u8, &indices7, block);
    }
}

/// Decodes the 8-entry palette of an interpolated alpha block
pub fn palette_bc3(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let a0 = alpha0 as u32;
    let a1 = alpha1 as u32;

    let mut codes = [0u8; 8];
    codes[0] = alpha0;
    codes[1] = alpha1;
    if alpha0 <= alpha1 {
        for i in 1..5u32 {
            codes[1 + i as usize] = (((5 - i) * a0 + i * a1) / 5) as u8;
        }
        codes[6] = 0;
        codes[7] = 255;
    } else {
        for i in 1..7u32 {
            codes[1 + i as usize] = (((7 - i) * a0 + i * a1) / 7) as u8;
        }
    }
    codes
}

/// Decompresses an interpolated alpha block into one channel of `rgba`
pub fn decompress_bc3(rgba: &mut [[u8; 4]; 16], channel: usize, block: &[u8]) {
    let codes = palette_bc3(block[0], block[1]);

    for (group, src) in block[2..8].chunks_exact(3).enumerate() {
        let packed = u32::from_le_bytes([src[0], src[1], src[2], 0]);
        for j in 0..8 {
            let index = (packed >> (3 * j)) & 0x7;
            rgba[8 * group + j][channel] = codes[index as usize];
        }
    }
}

//--------------------------------------------------------------------------------
// Unit tests
//--------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn alpha_block(alphas: &[u8]) -> [[u8; 4]; 16] {
        let mut rgba = [[0u8; 4]; 16];
        for (i, p) in rgba.iter_mut().enumerate() {
            p[3] = alphas[i % alphas.len()];
        }
        rgba
    }

    fn roundtrip_bc3(rgba: &[[u8; 4]; 16]) -> ([u8; 8], [[u8; 4]; 16]) {
        let mut block = [0u8; 8];
        compress_bc3(rgba, 3, 0xFFFF, &mut block);
        let mut decoded = [[0u8; 4]; 16];
        decompress_bc3(&mut decoded, 3, &block);
        (block, decoded)
    }

    #[test]
    fn test_bc2_truncates_to_top_nibble() {
        let rgba = alpha_block(&[0x00, 0x0F, 0x10, 0xFF, 0x87, 0x80]);
        let mut block = [0u8; 8];
        compress_bc2(&rgba, 0xFFFF, &mut block);
        assert_eq!(block[0], 0x00);
        assert_eq!(block[1], 0xF1);

        let mut decoded = [[0u8; 4]; 16];
        decompress_bc2(&mut decoded, &block);
        assert_eq!(decoded[3][3], 0xFF);
        assert_eq!(decoded[4][3], 0x88);
        assert_eq!(decoded[5][3], 0x88);
    }

    #[test]
    fn test_bc2_masked_pixels_are_zero() {
        let rgba = alpha_block(&[0xFF]);
        let mut block = [0u8; 8];
        compress_bc2(&rgba, 0x0001, &mut block);
        assert_eq!(block, [0x0F, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_bc3_canonical_values_are_exact() {
        let rgba = alpha_block(&[0, 85, 170, 255]);
        let (block, decoded) = roundtrip_bc3(&rgba);
        // the 0/255 palette holds every value
        assert!(block[0] <= block[1]);
        for (a, b) in rgba.iter().zip(decoded.iter()) {
            assert_eq!(a[3], b[3]);
        }
    }

    #[test]
    fn test_bc3_tie_prefers_ascending_palette() {
        // both palettes hold 0 and 255 exactly
        let rgba = alpha_block(&[0, 255]);
        let (block, decoded) = roundtrip_bc3(&rgba);
        assert!(block[0] <= block[1]);
        assert_eq!(block, [0, 5, 56, 142, 227, 56, 142, 227]);
        for (a, b) in rgba.iter().zip(decoded.iter()) {
            assert_eq!(a[3], b[3]);
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(128)]
    #[case(254)]
    #[case(255)]
    fn test_bc3_uniform_block_is_collapsed(#[case] alpha: u8) {
        let (block, decoded) = roundtrip_bc3(&alpha_block(&[alpha]));
        assert_eq!(block, [alpha, alpha, 0, 0, 0, 0, 0, 0]);
        assert!(decoded.iter().all(|p| p[3] == alpha));
    }

    #[test]
    fn test_bc3_gradient_uses_descending_palette() {
        let alphas: [u8; 16] = core::array::from_fn(|i| 100 + 7 * i as u8);
        let (block, decoded) = roundtrip_bc3(&alpha_block(&alphas));
        assert!(block[0] > block[1]);
        for (a, b) in alphas.iter().zip(decoded.iter()) {
            assert!((*a as i32 - b[3] as i32).abs() <= 8);
        }
    }

    #[test]
    fn test_bc3_palette_modes() {
        assert_eq!(palette_bc3(255, 0), [255, 0, 218, 182, 145, 109, 72, 36]);
        assert_eq!(palette_bc3(0, 255), [0, 255, 51, 102, 153, 204, 0, 255]);
    }

    #[test]
    fn test_bc3_index_packing() {
        let mut indices = [0u8; 16];
        indices[0] = 7;
        indices[8] = 1;
        indices[15] = 5;
        let mut block = [0u8; 8];
        write_alpha_block(200, 10, &indices, &mut block);
        assert_eq!(block, [200, 10, 0x07, 0x00, 0x00, 0x01, 0x00, 0xA0]);
    }

    #[test]
    fn test_bc3_other_channel() {
        let mut rgba = [[0u8; 4]; 16];
        for (i, p) in rgba.iter_mut().enumerate() {
            p[0] = (i * 16) as u8;
            p[3] = 255;
        }
        let mut block = [0u8; 8];
        compress_bc3(&rgba, 0, 0xFFFF, &mut block);

        let mut decoded = [[0u8; 4]; 16];
        decompress_bc3(&mut decoded, 0, &block);
        for (a, b) in rgba.iter().zip(decoded.iter()) {
            assert!((a[0] as i32 - b[0] as i32).abs() <= 20);
            // other channels untouched
            assert_eq!(b[3], 0);
        }
    }
}
