use rstest::rstest;
use squish_bcn::{compute_mse, Algorithm, Error, Flags, Format, Params, PixelOrder};

/// Deterministic pseudo random test image
fn noise_image(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    (0..width * height * 4)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

/// Smooth gradient with a diagonal alpha ramp
fn gradient_image(width: usize, height: usize) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            rgba.extend_from_slice(&[
                (255 * x / (width - 1).max(1)) as u8,
                (255 * y / (height - 1).max(1)) as u8,
                128,
                ((x + y) * 255 / (width + height)) as u8,
            ]);
        }
    }
    rgba
}

#[rstest]
#[case(Format::Dxt1, 1, 1, 8)]
#[case(Format::Dxt1, 4, 4, 8)]
#[case(Format::Dxt1, 5, 5, 32)]
#[case(Format::Dxt3, 8, 3, 32)]
#[case(Format::Dxt5, 13, 7, 128)]
#[case(Format::Bc4, 17, 1, 40)]
#[case(Format::Bc5, 2, 9, 48)]
fn compressed_length_matches_block_grid(
    #[case] format: Format,
    #[case] width: usize,
    #[case] height: usize,
    #[case] expected: usize,
) {
    let rgba = noise_image(width, height, 7);
    let blocks = format.compress_to_vec(&rgba, width, height, Params::default()).unwrap();
    assert_eq!(blocks.len(), expected);
    assert_eq!(format.compressed_size(width, height), expected);

    let pixels = format.decompress_to_vec(&blocks, width, height, PixelOrder::Rgba).unwrap();
    assert_eq!(pixels.len(), width * height * 4);
}

#[test]
fn edge_blocks_replicate_border_pixels() {
    // 5x5 image, every pixel except the last row and column is black
    let mut rgba = vec![0u8; 5 * 5 * 4];
    for (i, pixel) in rgba.chunks_mut(4).enumerate() {
        let (x, y) = (i % 5, i / 5);
        pixel[3] = 255;
        if x == 4 || y == 4 {
            pixel[..3].copy_from_slice(&[255, 255, 255]);
        }
    }

    let blocks = Format::Dxt1.compress_to_vec(&rgba, 5, 5, Params::default()).unwrap();
    assert_eq!(blocks.len(), 4 * 8);

    // the three edge blocks only see white pixels and are stored exactly
    for block in blocks.chunks(8).skip(1) {
        assert_eq!(block, [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
    }

    let decoded = Format::Dxt1.decompress_to_vec(&blocks, 5, 5, PixelOrder::Rgba).unwrap();
    assert_eq!(decoded, rgba);
}

#[rstest]
#[case(Format::Dxt1)]
#[case(Format::Dxt3)]
#[case(Format::Dxt5)]
#[case(Format::Bc4)]
#[case(Format::Bc5)]
fn bgra_source_gives_identical_blocks(#[case] format: Format) {
    let rgba = gradient_image(9, 6);
    let mut bgra = rgba.clone();
    for pixel in bgra.chunks_mut(4) {
        pixel.swap(0, 2);
    }

    let from_rgba = format.compress_to_vec(&rgba, 9, 6, Params::default()).unwrap();
    let params = Params {
        order: PixelOrder::Bgra,
        ..Params::default()
    };
    let from_bgra = format.compress_to_vec(&bgra, 9, 6, params).unwrap();
    assert_eq!(from_rgba, from_bgra);

    let mut decoded_rgba = format.decompress_to_vec(&from_rgba, 9, 6, PixelOrder::Rgba).unwrap();
    let decoded_bgra = format.decompress_to_vec(&from_rgba, 9, 6, PixelOrder::Bgra).unwrap();
    for pixel in decoded_rgba.chunks_mut(4) {
        pixel.swap(0, 2);
    }
    assert_eq!(decoded_rgba, decoded_bgra);
}

#[rstest]
#[case(Algorithm::RangeFit)]
#[case(Algorithm::ClusterFit)]
#[case(Algorithm::IterativeClusterFit)]
fn compression_is_deterministic(#[case] algorithm: Algorithm) {
    let rgba = noise_image(16, 12, 99);
    let params = Params {
        algorithm,
        weigh_colour_by_alpha: true,
        ..Params::default()
    };
    for format in [Format::Dxt1, Format::Dxt3, Format::Dxt5] {
        let first = format.compress_to_vec(&rgba, 16, 12, params).unwrap();
        let second = format.compress_to_vec(&rgba, 16, 12, params).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn white_dxt1_is_exact() {
    let rgba = vec![255u8; 7 * 5 * 4];
    for algorithm in [Algorithm::RangeFit, Algorithm::ClusterFit, Algorithm::IterativeClusterFit] {
        let params = Params {
            algorithm,
            ..Params::default()
        };
        let blocks = Format::Dxt1.compress_to_vec(&rgba, 7, 5, params).unwrap();
        let decoded = Format::Dxt1.decompress_to_vec(&blocks, 7, 5, PixelOrder::Rgba).unwrap();
        assert_eq!(decoded, rgba);
    }
}

#[test]
fn dxt5_alpha_levels_are_exact() {
    let levels = [0u8, 85, 170, 255];
    let mut rgba = vec![0u8; 8 * 8 * 4];
    for (i, pixel) in rgba.chunks_mut(4).enumerate() {
        pixel.copy_from_slice(&[40, 90, 160, levels[(i + i / 8) % 4]]);
    }

    let blocks = Format::Dxt5.compress_to_vec(&rgba, 8, 8, Params::default()).unwrap();
    let decoded = Format::Dxt5.decompress_to_vec(&blocks, 8, 8, PixelOrder::Rgba).unwrap();
    for (actual, expected) in decoded.chunks(4).zip(rgba.chunks(4)) {
        assert_eq!(actual[3], expected[3]);
    }

    let mse = compute_mse(&rgba, 8, 8, &blocks, Format::Dxt5, PixelOrder::Rgba).unwrap();
    assert_eq!(mse.alpha, 0.0);
}

#[rstest]
#[case([0, 0, 0, 255])]
#[case([12, 200, 99, 255])]
#[case([255, 128, 1, 255])]
#[case([77, 77, 77, 255])]
fn uniform_images_within_one_step(#[case] colour: [u8; 4]) {
    let rgba = colour.repeat(6 * 6);
    for algorithm in [Algorithm::RangeFit, Algorithm::ClusterFit, Algorithm::IterativeClusterFit] {
        let params = Params {
            algorithm,
            ..Params::default()
        };
        for format in [Format::Dxt1, Format::Dxt3, Format::Dxt5] {
            let blocks = format.compress_to_vec(&rgba, 6, 6, params).unwrap();
            let decoded = format.decompress_to_vec(&blocks, 6, 6, PixelOrder::Rgba).unwrap();
            for pixel in decoded.chunks(4) {
                assert!((pixel[0] as i32 - colour[0] as i32).abs() <= 8);
                assert!((pixel[1] as i32 - colour[1] as i32).abs() <= 4);
                assert!((pixel[2] as i32 - colour[2] as i32).abs() <= 8);
                assert_eq!(pixel[3], 255);
            }
        }
    }
}

#[test]
fn invalid_inputs_are_rejected_before_writing() {
    let rgba = noise_image(4, 4, 3);
    let mut blocks = [0xAAu8; 16];

    assert_eq!(
        Format::Dxt5.compress(&rgba, 0, 4, Params::default(), &mut blocks),
        Err(Error::InvalidDimensions { width: 0, height: 4 })
    );
    assert_eq!(
        Format::Dxt5.compress(&rgba[..63], 4, 4, Params::default(), &mut blocks),
        Err(Error::PixelBufferSize { expected: 64, actual: 63 })
    );
    assert_eq!(
        Format::Dxt1.compress(&rgba, 4, 4, Params::default(), &mut blocks),
        Err(Error::BlockBufferSize { expected: 8, actual: 16 })
    );
    assert_eq!(blocks, [0xAAu8; 16]);

    let mut pixels = vec![0x55u8; 64];
    assert_eq!(
        Format::Dxt3.decompress(&blocks[..8], 4, 4, PixelOrder::Rgba, &mut pixels),
        Err(Error::BlockBufferSize { expected: 16, actual: 8 })
    );
    assert_eq!(
        Format::Dxt3.decompress(&blocks, 4, 3, PixelOrder::Rgba, &mut pixels),
        Err(Error::PixelBufferSize { expected: 48, actual: 64 })
    );
    assert!(pixels.iter().all(|&p| p == 0x55));
}

#[test]
fn flags_drive_the_codec() {
    let flags = Flags::DXT5 | Flags::COLOUR_RANGE_FIT | Flags::SOURCE_BGRA;
    let format = flags.format().unwrap();
    let params = flags.params(None).unwrap();
    assert_eq!(format, Format::Dxt5);
    assert_eq!(params.algorithm, Algorithm::RangeFit);

    let rgba = gradient_image(8, 8);
    let mut bgra = rgba.clone();
    for pixel in bgra.chunks_mut(4) {
        pixel.swap(0, 2);
    }

    let expected = Format::Dxt5
        .compress_to_vec(
            &rgba,
            8,
            8,
            Params {
                algorithm: Algorithm::RangeFit,
                ..Params::default()
            },
        )
        .unwrap();
    assert_eq!(format.compress_to_vec(&bgra, 8, 8, params).unwrap(), expected);

    assert!(matches!(
        (Flags::DXT1 | Flags::BC4).format(),
        Err(Error::ConflictingFormats(_))
    ));
}
