use crate::config::PlayerConfig;
use crate::{PlayerError, Result, BYTES_PER_SAMPLE};
use ffmpeg_next as ffmpeg;
use log::{debug, info, warn};
use std::path::Path;

/// Pixel format every frame is scaled into before it reaches the converter
const TARGET_FORMAT: ffmpeg::format::Pixel = ffmpeg::format::Pixel::GRAY16BE;

/// Video decoder that extracts grayscale frames from video files
pub struct VideoDecoder {
    input_context: ffmpeg::format::context::Input,
    stream_index: usize,
    decoder: ffmpeg::codec::decoder::Video,
    scaler: Option<ffmpeg::software::scaling::Context>,
    target_width: u32,
    target_height: u32,
    frame_count: u64,
    eof_sent: bool,
}

/// A decoded, scaled GRAY16BE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Raw big-endian 16-bit samples, row-major, no padding
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame number, starting at 1
    pub frame_number: u64,
}

impl VideoFrame {
    /// Wrap a sample buffer, checking it holds exactly `width * height` samples
    pub fn new(data: Vec<u8>, width: u32, height: u32, frame_number: u64) -> Result<Self> {
        let expected = width as usize * height as usize * BYTES_PER_SAMPLE;
        if data.len() != expected {
            return Err(PlayerError::InvalidFrame(format!(
                "{}x{} frame needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            frame_number,
        })
    }

    /// Number of pixels in the frame
    pub fn pixel_count(&self) -> usize {
        self.data.len() / BYTES_PER_SAMPLE
    }
}

/// Target size for a source frame, divided by `scale_factor` and never smaller than 1x1
pub fn scaled_dimensions(width: u32, height: u32, scale_factor: u32) -> (u32, u32) {
    let scale_factor = scale_factor.max(1);
    ((width / scale_factor).max(1), (height / scale_factor).max(1))
}

/// Keep only the packets that belong to the selected stream
pub fn video_packets<I, P>(packets: I, stream_index: usize) -> impl Iterator<Item = P>
where
    I: IntoIterator<Item = (usize, P)>,
{
    packets
        .into_iter()
        .filter(move |(index, _)| *index == stream_index)
        .map(|(_, packet)| packet)
}

impl VideoDecoder {
    /// Open a video file and prepare decoding at `1 / scale_factor` of its size
    pub fn new(path: &Path, scale_factor: u32) -> Result<Self> {
        match ffmpeg::init() {
            Ok(_) => debug!("FFmpeg initialized successfully"),
            Err(e) => warn!("FFmpeg init error: {:?}", e),
        }

        debug!("Attempting to open video file: {}", path.display());
        let input_context =
            ffmpeg::format::input(&path).map_err(|source| PlayerError::ContainerOpen {
                path: path.to_path_buf(),
                source,
            })?;

        let stream = input_context
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| PlayerError::NoVideoStream(path.to_path_buf()))?;
        let stream_index = stream.index();
        info!("Found video stream {} in file '{}'", stream_index, path.display());

        let parameters = stream.parameters();
        let codec_id = parameters.id();
        let context_decoder = ffmpeg::codec::context::Context::from_parameters(parameters)
            .map_err(PlayerError::CodecOpen)?;
        let decoder = context_decoder.decoder().video().map_err(|e| match e {
            ffmpeg::Error::DecoderNotFound => PlayerError::CodecNotFound(codec_id),
            other => PlayerError::CodecOpen(other),
        })?;

        let (target_width, target_height) =
            scaled_dimensions(decoder.width(), decoder.height(), scale_factor);
        debug!(
            "Source {}x{}, rendering at {}x{}",
            decoder.width(),
            decoder.height(),
            target_width,
            target_height
        );

        Ok(Self {
            input_context,
            stream_index,
            decoder,
            scaler: None,
            target_width,
            target_height,
            frame_count: 0,
            eof_sent: false,
        })
    }

    /// Source video dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.decoder.width(), self.decoder.height())
    }

    /// Dimensions of the frames this decoder yields
    pub fn target_dimensions(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    /// Average frame rate of the selected stream, 0.0 when unknown
    pub fn frame_rate(&self) -> Result<f64> {
        let stream = self
            .input_context
            .stream(self.stream_index)
            .ok_or(PlayerError::StreamLookup(self.stream_index))?;
        let rate = stream.avg_frame_rate();
        Ok(if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        })
    }

    /// Get the next frame from the video
    pub fn next_frame(&mut self) -> Result<Option<VideoFrame>> {
        let mut decoded_frame = ffmpeg::frame::Video::empty();

        loop {
            match self.decoder.receive_frame(&mut decoded_frame) {
                Ok(()) => {
                    self.frame_count += 1;
                    return self.convert_frame(&decoded_frame).map(Some);
                }
                Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::ffi::EAGAIN => {}
                Err(ffmpeg::Error::Eof) => return Ok(None),
                Err(e) => return Err(PlayerError::VideoDecoding(e)),
            }

            if self.eof_sent {
                return Ok(None);
            }

            // Audio and subtitle packets never reach the decoder
            let packets = self
                .input_context
                .packets()
                .map(|(stream, packet)| (stream.index(), packet));
            match video_packets(packets, self.stream_index).next() {
                Some(packet) => self.decoder.send_packet(&packet)?,
                None => {
                    debug!("End of container, draining decoder");
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
            }
        }
    }

    /// Scale a decoded frame to GRAY16BE and copy out its samples without row padding
    fn convert_frame(&mut self, frame: &ffmpeg::frame::Video) -> Result<VideoFrame> {
        if self.scaler.is_none() {
            self.scaler = Some(
                ffmpeg::software::scaling::Context::get(
                    frame.format(),
                    frame.width(),
                    frame.height(),
                    TARGET_FORMAT,
                    self.target_width,
                    self.target_height,
                    ffmpeg::software::scaling::Flags::BICUBIC,
                )
                .map_err(|e| {
                    PlayerError::FrameAllocation(format!("cannot create scaling context: {}", e))
                })?,
            );
        }

        let mut gray_frame = ffmpeg::frame::Video::empty();
        if let Some(ref mut scaler) = self.scaler {
            scaler
                .run(frame, &mut gray_frame)
                .map_err(|e| PlayerError::FrameAllocation(format!("cannot scale frame: {}", e)))?;
        }

        let width = gray_frame.width();
        let height = gray_frame.height();
        let row_bytes = width as usize * BYTES_PER_SAMPLE;
        let stride = gray_frame.stride(0);
        if stride < row_bytes {
            return Err(PlayerError::FrameAllocation(format!(
                "line size {} shorter than row of {} bytes",
                stride, row_bytes
            )));
        }

        let mut data = Vec::with_capacity(row_bytes * height as usize);
        for row in gray_frame.data(0).chunks(stride).take(height as usize) {
            let pixels = row
                .get(..row_bytes)
                .ok_or_else(|| PlayerError::FrameAllocation("truncated pixel plane".to_string()))?;
            data.extend_from_slice(pixels);
        }

        debug!("Decoded frame {}: {}x{}", self.frame_count, width, height);

        VideoFrame::new(data, width, height, self.frame_count)
    }
}

/// Iterator wrapper for VideoDecoder
pub struct FrameIterator {
    decoder: VideoDecoder,
    failed: bool,
}

impl FrameIterator {
    /// Create a new frame iterator
    pub fn new(decoder: VideoDecoder) -> Self {
        Self { decoder, failed: false }
    }

    /// Get the underlying decoder reference
    pub fn decoder(&self) -> &VideoDecoder {
        &self.decoder
    }
}

impl Iterator for FrameIterator {
    type Item = Result<VideoFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.decoder.next_frame() {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Create a frame iterator from a video file
pub fn load_video(path: &Path, config: &PlayerConfig) -> Result<FrameIterator> {
    let decoder = VideoDecoder::new(path, config.scale_factor)?;
    Ok(FrameIterator::new(decoder))
}
