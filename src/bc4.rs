use crate::{alpha, private, Decoder, Encoder, Params};

/// A single interpolated channel taken from red, 8 bytes per block.
pub struct BC4 {}

impl private::BlockFormat for BC4 {
    fn block_size() -> usize {
        8
    }

    fn name() -> &'static str {
        "BC4"
    }
}

impl private::Decoder for BC4 {
    fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
        // decompress alpha
        let mut rgba = [[0u8; 4]; 16];
        alpha::decompress_bc3(&mut rgba, 0, &block[..8]);
        // splat decompressed value into g and b channels
        for pixel in rgba.iter_mut() {
            pixel[1] = pixel[0];
            pixel[2] = pixel[0];
            pixel[3] = 255;
        }
        rgba
    }
}

impl Decoder for BC4 {}

impl private::Encoder for BC4 {
    fn compress_block_masked(rgba: [[u8; 4]; 16], mask: u32, _params: Params, output: &mut [u8]) {
        // compress alpha block(s)
        alpha::compress_bc3(&rgba, 0, mask, &mut output[..8]);
    }
}

impl Encoder for BC4 {}
