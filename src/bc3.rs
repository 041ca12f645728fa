use crate::{
    alpha, colourblock, compress_bc1_bc2_bc3_colour_block, private, Decoder, Encoder, Params,
};

/// Interpolated alpha followed by a colour block, 16 bytes per block.
#[doc(alias = "DXT5")]
pub struct BC3 {}

impl private::BlockFormat for BC3 {
    fn block_size() -> usize {
        16
    }

    fn name() -> &'static str {
        "DXT5"
    }
}

impl private::Decoder for BC3 {
    fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
        // decompress colour block, always in 4-colour mode
        let mut rgba = colourblock::decompress(&block[8..16], false);
        // decompress alpha block(s)
        alpha::decompress_bc3(&mut rgba, 3, &block[..8]);
        rgba
    }
}

impl Decoder for BC3 {}

impl private::Encoder for BC3 {
    fn compress_block_masked(rgba: [[u8; 4]; 16], mask: u32, params: Params, output: &mut [u8]) {
        compress_bc1_bc2_bc3_colour_block(rgba, mask, params, output, false);

        // compress alpha block(s)
        alpha::compress_bc3(&rgba, 3, mask, &mut output[..8]);
    }
}

impl Encoder for BC3 {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    #[test]
    fn test_storage_requirements() {
        assert_eq!(BC3::compressed_size(16, 32), 512);
        assert_eq!(BC3::compressed_size(15, 32), 512);
    }

    #[test]
    fn test_bc3_alpha_levels_are_exact() {
        let levels = [0u8, 85, 170, 255];
        let mut rgba = [0u8; 4 * 4 * 4];
        for (i, pixel) in rgba.chunks_mut(4).enumerate() {
            pixel.copy_from_slice(&[255, 150, 74, levels[i % 4]]);
        }

        let mut output = [0u8; 16];
        BC3::compress(&rgba, 4, 4, Params::default(), &mut output).unwrap();

        let mut decoded = [0u8; 4 * 4 * 4];
        BC3::decompress(&output, 4, 4, PixelOrder::Rgba, &mut decoded).unwrap();
        for (actual, expected) in decoded.chunks(4).zip(rgba.chunks(4)) {
            assert_eq!(actual[3], expected[3]);
        }
    }

    #[test]
    fn test_bc3_colour_ignores_alpha() {
        // DXT5 never uses the transparent colour mode, even for cut out pixels
        let mut rgba = [0u8; 4 * 4 * 4];
        for (i, pixel) in rgba.chunks_mut(4).enumerate() {
            pixel.copy_from_slice(&[255, 255, 255, if i < 8 { 0 } else { 255 }]);
        }

        let mut output = [0u8; 16];
        BC3::compress(&rgba, 4, 4, Params::default(), &mut output).unwrap();
        assert_eq!(output[8..], [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);

        let mut decoded = [0u8; 4 * 4 * 4];
        BC3::decompress(&output, 4, 4, PixelOrder::Rgba, &mut decoded).unwrap();
        assert_eq!(decoded, rgba);
    }
}
