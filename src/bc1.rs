use crate::{colourblock, compress_bc1_bc2_bc3_colour_block, private, Decoder, Encoder, Params};

/// Colour with optional 1-bit alpha, 8 bytes per block.
#[doc(alias = "DXT1")]
pub struct BC1 {}

impl private::BlockFormat for BC1 {
    fn block_size() -> usize {
        8
    }

    fn name() -> &'static str {
        "DXT1"
    }
}

impl private::Decoder for BC1 {
    fn decompress_block(block: &[u8]) -> [[u8; 4]; 16] {
        // decompress colour block, honouring the 3-colour + transparent mode
        colourblock::decompress(&block[..8], true)
    }
}

impl Decoder for BC1 {}

impl private::Encoder for BC1 {
    fn compress_block_masked(rgba: [[u8; 4]; 16], mask: u32, params: Params, output: &mut [u8]) {
        compress_bc1_bc2_bc3_colour_block(rgba, mask, params, output, true)
    }
}

impl Encoder for BC1 {}
