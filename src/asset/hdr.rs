use thiserror::Error;

/// A decoded Radiance HDR image, stored as interleaved RGBE8 texels.
#[derive(Clone, Debug, PartialEq)]
pub struct HdrImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, shared-exponent encoded.
    pub pixels: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum HdrError {
    #[error("not a radiance HDR image")]
    BadSignature,
    #[error("unsupported pixel format `{0}`")]
    UnsupportedFormat(String),
    #[error("malformed resolution line `{0}`")]
    BadResolution(String),
    #[error("truncated scanline data")]
    Truncated,
    #[error("corrupt run-length encoding")]
    CorruptRle,
}

/// Decodes a Radiance HDR (RGBE) image into its raw shared-exponent texels.
///
/// Handles the adaptive per-component RLE used by every modern encoder as
/// well as the flat and old-style run-length formats found in older files.
pub fn decode_hdr(bytes: &[u8]) -> Result<HdrImage, HdrError> {
    let mut cursor = 0;

    let signature = read_line(bytes, &mut cursor).ok_or(HdrError::BadSignature)?;

    if !signature.starts_with("#?") {
        return Err(HdrError::BadSignature);
    }

    let mut format: Option<String> = None;

    let resolution = loop {
        let line = read_line(bytes, &mut cursor).ok_or(HdrError::Truncated)?;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(value) = strip_prefix(&line, "FORMAT=") {
            format = Some(value.trim().to_owned());
            continue;
        }

        if line.contains('=') {
            continue; // EXPOSURE, GAMMA and other header variables
        }

        break line;
    };

    match format.as_deref() {
        Some("32-bit_rle_rgbe") => {}
        Some(other) => return Err(HdrError::UnsupportedFormat(other.to_owned())),
        None => return Err(HdrError::UnsupportedFormat(String::from("unspecified"))),
    }

    let (width, height) = parse_resolution(&resolution)?;

    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    let mut scanline = vec![0u8; (width * 4) as usize];

    for _ in 0..height {
        read_scanline(bytes, &mut cursor, width as usize, &mut scanline)?;
        pixels.extend_from_slice(&scanline);
    }

    Ok(HdrImage {
        width,
        height,
        pixels,
    })
}

/// Expands one RGBE8 texel into linear radiance.
pub fn rgbe_to_rgb(texel: [u8; 4]) -> [f32; 3] {
    let exponent = texel[3];

    if exponent == 0 {
        return [0.0, 0.0, 0.0];
    }

    let scale = (exponent as f32 - 136.0).exp2();

    [
        texel[0] as f32 * scale,
        texel[1] as f32 * scale,
        texel[2] as f32 * scale,
    ]
}

fn read_line(bytes: &[u8], cursor: &mut usize) -> Option<String> {
    if *cursor >= bytes.len() {
        return None;
    }

    let start = *cursor;

    while *cursor < bytes.len() && bytes[*cursor] != b'\n' {
        *cursor += 1;
    }

    let line = String::from_utf8_lossy(&bytes[start..*cursor]).into_owned();
    *cursor += 1; // past the newline

    Some(line)
}

fn strip_prefix<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    if line.starts_with(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

fn parse_resolution(line: &str) -> Result<(u32, u32), HdrError> {
    let bad = || HdrError::BadResolution(line.to_owned());

    let mut words = line.split_whitespace();

    // only the standard row-major top-down orientation is accepted
    if words.next() != Some("-Y") {
        return Err(bad());
    }

    let height: u32 = words.next().and_then(|w| w.parse().ok()).ok_or_else(bad)?;

    if words.next() != Some("+X") {
        return Err(bad());
    }

    let width: u32 = words.next().and_then(|w| w.parse().ok()).ok_or_else(bad)?;

    if width == 0 || height == 0 {
        return Err(bad());
    }

    Ok((width, height))
}

fn read_byte(bytes: &[u8], cursor: &mut usize) -> Result<u8, HdrError> {
    let byte = *bytes.get(*cursor).ok_or(HdrError::Truncated)?;
    *cursor += 1;

    Ok(byte)
}

fn read_scanline(
    bytes: &[u8],
    cursor: &mut usize,
    width: usize,
    scanline: &mut [u8],
) -> Result<(), HdrError> {
    let header = [
        read_byte(bytes, cursor)?,
        read_byte(bytes, cursor)?,
        read_byte(bytes, cursor)?,
        read_byte(bytes, cursor)?,
    ];

    let is_adaptive = header[0] == 2
        && header[1] == 2
        && ((header[2] as usize) << 8 | header[3] as usize) == width
        && (8..=32767).contains(&width);

    if is_adaptive {
        return read_adaptive_scanline(bytes, cursor, width, scanline);
    }

    // flat data, possibly with old-style run markers
    *cursor -= 4;
    read_flat_scanline(bytes, cursor, width, scanline)
}

fn read_adaptive_scanline(
    bytes: &[u8],
    cursor: &mut usize,
    width: usize,
    scanline: &mut [u8],
) -> Result<(), HdrError> {
    for component in 0..4 {
        let mut filled = 0;

        while filled < width {
            let code = read_byte(bytes, cursor)? as usize;

            if code > 128 {
                let run = code - 128;
                let value = read_byte(bytes, cursor)?;

                if filled + run > width {
                    return Err(HdrError::CorruptRle);
                }

                for _ in 0..run {
                    scanline[filled * 4 + component] = value;
                    filled += 1;
                }
            } else {
                if code == 0 || filled + code > width {
                    return Err(HdrError::CorruptRle);
                }

                for _ in 0..code {
                    scanline[filled * 4 + component] = read_byte(bytes, cursor)?;
                    filled += 1;
                }
            }
        }
    }

    Ok(())
}

fn read_flat_scanline(
    bytes: &[u8],
    cursor: &mut usize,
    width: usize,
    scanline: &mut [u8],
) -> Result<(), HdrError> {
    let mut filled = 0;
    let mut shift = 0u32;

    while filled < width {
        let texel = [
            read_byte(bytes, cursor)?,
            read_byte(bytes, cursor)?,
            read_byte(bytes, cursor)?,
            read_byte(bytes, cursor)?,
        ];

        if texel[0] == 1 && texel[1] == 1 && texel[2] == 1 {
            // old-style run marker repeating the previous texel
            if filled == 0 || shift > 24 {
                return Err(HdrError::CorruptRle);
            }

            let run = (texel[3] as usize) << shift;

            if filled + run > width {
                return Err(HdrError::CorruptRle);
            }

            let previous = [
                scanline[(filled - 1) * 4],
                scanline[(filled - 1) * 4 + 1],
                scanline[(filled - 1) * 4 + 2],
                scanline[(filled - 1) * 4 + 3],
            ];

            for _ in 0..run {
                scanline[filled * 4..filled * 4 + 4].copy_from_slice(&previous);
                filled += 1;
            }

            shift += 8;
        } else {
            scanline[filled * 4..filled * 4 + 4].copy_from_slice(&texel);
            filled += 1;
            shift = 0;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: u32, height: u32) -> Vec<u8> {
        format!(
            "#?RADIANCE\nFORMAT=32-bit_rle_rgbe\n\n-Y {} +X {}\n",
            height, width
        )
        .into_bytes()
    }

    #[test]
    fn rejects_non_hdr_data() {
        match decode_hdr(b"\x89PNG\r\n") {
            Err(HdrError::BadSignature) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_pixel_formats() {
        let bytes = b"#?RADIANCE\nFORMAT=32-bit_rle_xyze\n\n-Y 1 +X 1\n\x80\x80\x80\x80";

        match decode_hdr(bytes) {
            Err(HdrError::UnsupportedFormat(format)) => {
                assert_eq!(format, "32-bit_rle_xyze");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn decodes_flat_scanlines() {
        let mut bytes = header(2, 2);
        bytes.extend_from_slice(&[
            10, 20, 30, 128, 40, 50, 60, 128, // row 0
            1, 2, 3, 129, 4, 5, 6, 129, // row 1
        ]);

        let image = decode_hdr(&bytes).unwrap();

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(&image.pixels[..4], &[10, 20, 30, 128]);
        assert_eq!(&image.pixels[12..], &[4, 5, 6, 129]);
    }

    #[test]
    fn decodes_adaptive_rle_scanlines() {
        let width = 8u32;
        let mut bytes = header(width, 1);

        // scanline marker followed by one run per component
        bytes.extend_from_slice(&[2, 2, 0, 8]);
        bytes.extend_from_slice(&[136, 10]); // 8x red 10
        bytes.extend_from_slice(&[136, 20]); // 8x green 20
        bytes.extend_from_slice(&[136, 30]); // 8x blue 30
        bytes.extend_from_slice(&[136, 128]); // 8x exponent 128

        let image = decode_hdr(&bytes).unwrap();

        assert_eq!(image.pixels.len(), 32);

        for texel in image.pixels.chunks(4) {
            assert_eq!(texel, &[10, 20, 30, 128]);
        }
    }

    #[test]
    fn decodes_adaptive_literal_spans() {
        let mut bytes = header(8, 1);

        bytes.extend_from_slice(&[2, 2, 0, 8]);
        bytes.extend_from_slice(&[8, 1, 2, 3, 4, 5, 6, 7, 8]); // literal reds
        bytes.extend_from_slice(&[136, 0]);
        bytes.extend_from_slice(&[136, 0]);
        bytes.extend_from_slice(&[4, 128, 128, 128, 128, 132, 129]); // mixed exponents

        let image = decode_hdr(&bytes).unwrap();

        let reds: Vec<u8> = image.pixels.chunks(4).map(|t| t[0]).collect();
        assert_eq!(reds, vec![1, 2, 3, 4, 5, 6, 7, 8]);

        let exponents: Vec<u8> = image.pixels.chunks(4).map(|t| t[3]).collect();
        assert_eq!(exponents, vec![128, 128, 128, 128, 129, 129, 129, 129]);
    }

    #[test]
    fn expands_old_style_runs() {
        let mut bytes = header(4, 1);
        bytes.extend_from_slice(&[10, 20, 30, 128]);
        bytes.extend_from_slice(&[1, 1, 1, 3]); // repeat previous texel 3x

        let image = decode_hdr(&bytes).unwrap();

        for texel in image.pixels.chunks(4) {
            assert_eq!(texel, &[10, 20, 30, 128]);
        }
    }

    #[test]
    fn truncated_data_is_an_error() {
        let mut bytes = header(8, 1);
        bytes.extend_from_slice(&[2, 2, 0, 8, 136]);

        match decode_hdr(&bytes) {
            Err(HdrError::Truncated) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rgbe_expansion_matches_the_shared_exponent() {
        assert_eq!(rgbe_to_rgb([255, 128, 0, 0]), [0.0, 0.0, 0.0]);

        // exponent 136 means a scale of exactly 1
        assert_eq!(rgbe_to_rgb([1, 2, 4, 136]), [1.0, 2.0, 4.0]);
        assert_eq!(rgbe_to_rgb([128, 0, 0, 137]), [256.0, 0.0, 0.0]);
    }
}
