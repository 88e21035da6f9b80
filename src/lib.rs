//! Console Video Player - draws the frames of a video as ASCII text
//!
//! Frames are decoded and scaled by FFmpeg into 16-bit grayscale, then every
//! pixel is quantized to one character of a small palette and printed row by
//! row on standard output. There is no audio and no playback timing: frames
//! are written as fast as they are decoded, separated by a blank line.

use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod converter;
pub mod decoder;
pub mod player;
pub mod prelude;
pub mod renderer;

pub use cli::Cli;
pub use config::PlayerConfig;
pub use converter::{samples, FrameConverter, Palette, Quantizer};
pub use decoder::{
    load_video, scaled_dimensions, video_packets, FrameIterator, VideoDecoder, VideoFrame,
};
pub use player::Player;
pub use renderer::Renderer;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of distinct intensities in the 16-bit grayscale format
pub const INTENSITY_RANGE: u32 = 65536;

/// Bytes making up one grayscale sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// Default palette, darkest to brightest
pub const DEFAULT_PALETTE: &str = " .-+#";

/// Default divisor applied to the source frame dimensions
pub const DEFAULT_SCALE_FACTOR: u32 = 4;

/// File played when no path is given on the command line
pub const DEFAULT_FILE_NAME: &str = "tests-sample.mp4";

/// Error types used throughout the application
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    #[error("Failed to open media container '{path}': {source}")]
    ContainerOpen {
        path: PathBuf,
        #[source]
        source: ffmpeg_next::Error,
    },

    #[error("No video stream found in '{0}'")]
    NoVideoStream(PathBuf),

    #[error("No decoder available for codec {0:?}")]
    CodecNotFound(ffmpeg_next::codec::Id),

    #[error("Failed to open codec: {0}")]
    CodecOpen(#[source] ffmpeg_next::Error),

    #[error("Failed to allocate scaled frame: {0}")]
    FrameAllocation(String),

    #[error("Stream {0} not found in container")]
    StreamLookup(usize),

    #[error("Video decoding error: {0}")]
    VideoDecoding(#[from] ffmpeg_next::Error),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed configuration file: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, PlayerError>;
