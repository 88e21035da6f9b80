use crate::decoder::VideoFrame;
use crate::{PlayerError, Result, BYTES_PER_SAMPLE, DEFAULT_PALETTE, INTENSITY_RANGE};
use log::debug;

/// Reinterpret a GRAY16BE byte buffer as a lazy sequence of intensity samples.
///
/// Every pair of bytes starting at an even index forms one sample,
/// `256 * first + second`. A trailing odd byte is ignored.
pub fn samples(buffer: &[u8]) -> impl ExactSizeIterator<Item = u16> + '_ {
    buffer
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
}

/// Ordered set of characters, darkest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    chars: Vec<char>,
}

impl Palette {
    /// Build a palette from a string of characters, darkest first
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(PlayerError::InvalidConfig(
                "Palette must contain at least one character".to_string(),
            ));
        }
        Ok(Self { chars })
    }

    /// Number of characters in the palette
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; an empty palette cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`, if any
    pub fn get(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            chars: DEFAULT_PALETTE.chars().collect(),
        }
    }
}

/// Maps intensity samples onto palette characters using equal-width buckets
#[derive(Debug, Clone)]
pub struct Quantizer {
    palette: Palette,
    bucket_width: u32,
}

impl Quantizer {
    /// Create a quantizer for the given palette
    pub fn new(palette: Palette) -> Self {
        let size = u32::try_from(palette.len()).unwrap_or(u32::MAX);
        let bucket_width = INTENSITY_RANGE / size;
        debug!("Quantizer: {} characters, bucket width {}", size, bucket_width);
        Self { palette, bucket_width }
    }

    /// Width of one intensity bucket
    pub fn bucket_width(&self) -> u32 {
        self.bucket_width
    }

    /// The palette this quantizer draws from
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Palette index for a sample.
    ///
    /// Dividing by `bucket_width + 1` keeps the brightest sample inside the
    /// palette: `(65536 / n + 1) * n > 65535` for every palette size `n`.
    pub fn index(&self, sample: u16) -> usize {
        (u32::from(sample) / (self.bucket_width + 1)) as usize
    }

    /// Character for a sample
    pub fn quantize(&self, sample: u16) -> char {
        self.palette.chars[self.index(sample)]
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

/// Video frame to ASCII converter
#[derive(Debug, Clone, Default)]
pub struct FrameConverter {
    quantizer: Quantizer,
}

impl FrameConverter {
    /// Create a new frame converter around a quantizer
    pub fn new(quantizer: Quantizer) -> Self {
        Self { quantizer }
    }

    /// Characters of a frame in buffer order (row-major, top to bottom)
    pub fn characters<'a>(&'a self, frame: &'a VideoFrame) -> impl Iterator<Item = char> + 'a {
        samples(&frame.data).map(move |sample| self.quantizer.quantize(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_of_size(size: usize) -> Palette {
        let chars: String = (0..size).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        Palette::new(&chars).unwrap()
    }

    #[test]
    fn test_samples_are_big_endian_pairs() {
        let buffer = [0x00, 0x00, 0x01, 0x02, 0xFF, 0xFF, 0x80, 0x00];
        let values: Vec<u16> = samples(&buffer).collect();
        assert_eq!(values, vec![0, 0x0102, 65535, 0x8000]);
    }

    #[test]
    fn test_samples_match_formula() {
        let buffer: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
        let values: Vec<u16> = samples(&buffer).collect();
        assert_eq!(values.len(), buffer.len() / 2);
        for (i, value) in values.iter().enumerate() {
            let expected = 256 * u32::from(buffer[2 * i]) + u32::from(buffer[2 * i + 1]);
            assert_eq!(u32::from(*value), expected);
        }
    }

    #[test]
    fn test_samples_ignore_trailing_byte() {
        let buffer = [0x12, 0x34, 0x56];
        let values: Vec<u16> = samples(&buffer).collect();
        assert_eq!(values, vec![0x1234]);
        assert_eq!(samples(&[]).len(), 0);
    }

    #[test]
    fn test_palette_rejects_empty() {
        assert!(matches!(Palette::new(""), Err(PlayerError::InvalidConfig(_))));
        assert_eq!(Palette::default().len(), 5);
        assert_eq!(Palette::default().get(0), Some(' '));
        assert_eq!(Palette::default().get(4), Some('#'));
    }

    #[test]
    fn test_default_extremes() {
        let quantizer = Quantizer::default();
        assert_eq!(quantizer.bucket_width(), 13107);
        assert_eq!(quantizer.index(0), 0);
        assert_eq!(quantizer.index(65535), 4);
        assert_eq!(quantizer.quantize(0), ' ');
        assert_eq!(quantizer.quantize(65535), '#');
    }

    #[test]
    fn test_default_bucket_boundaries() {
        let quantizer = Quantizer::default();
        assert_eq!(quantizer.index(13107), 0);
        assert_eq!(quantizer.index(13108), 1);
        assert_eq!(quantizer.index(26215), 1);
        assert_eq!(quantizer.index(26216), 2);
    }

    #[test]
    fn test_every_sample_maps_inside_palette() {
        for size in [1, 2, 3, 5, 7, 10, 16, 70, 256, 65535, 65536, 70000] {
            let quantizer = Quantizer::new(palette_of_size(size));
            for sample in 0..=u16::MAX {
                assert!(quantizer.index(sample) < size, "size {} sample {}", size, sample);
            }
        }
    }

    #[test]
    fn test_quantization_is_monotonic() {
        for size in [2, 5, 9] {
            let quantizer = Quantizer::new(palette_of_size(size));
            let mut previous = 0;
            for sample in 0..=u16::MAX {
                let index = quantizer.index(sample);
                assert!(index >= previous);
                previous = index;
            }
        }
    }

    #[test]
    fn test_frame_characters() {
        let converter = FrameConverter::default();
        let frame = VideoFrame::new(vec![0x00, 0x00, 0xFF, 0xFF, 0x80, 0x00], 3, 1, 1).unwrap();
        let chars: String = converter.characters(&frame).collect();
        assert_eq!(chars, " #-");
    }
}
