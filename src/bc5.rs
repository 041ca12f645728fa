use crate::{alpha, private, Decoder, Encoder, Params};

/// Two interpolated channels taken from red and green, 16 bytes per block.
pub struct BC5 {}

impl private::BlockFormat for BC5 {
    fn block_size() -> usize {
        16
    }

    fn name() -> &'static str {
        "BC5"
    }
}

impl private::Decoder for BC5 {
    fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
        // blue stays zero, alpha is opaque
        let mut rgba = [[0, 0, 0, 255]; 16];
        alpha::decompress_bc3(&mut rgba, 0, &block[..8]);
        alpha::decompress_bc3(&mut rgba, 1, &block[8..16]);
        rgba
    }
}

impl Decoder for BC5 {}

impl private::Encoder for BC5 {
    fn compress_block_masked(rgba: [[u8; 4]; 16], mask: u32, _params: Params, output: &mut [u8]) {
        // compress alpha block(s)
        alpha::compress_bc3(&rgba, 0, mask, &mut output[0..8]);
        alpha::compress_bc3(&rgba, 1, mask, &mut output[8..16]);
    }
}

impl Encoder for BC5 {}
