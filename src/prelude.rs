// Re-export commonly used types for convenience
pub use crate::cli::Cli;
pub use crate::config::PlayerConfig;
pub use crate::converter::{samples, FrameConverter, Palette, Quantizer};
pub use crate::decoder::{
    load_video, scaled_dimensions, video_packets, FrameIterator, VideoDecoder, VideoFrame,
};
pub use crate::player::Player;
pub use crate::renderer::Renderer;
pub use crate::{PlayerError, Result};
pub use crate::{
    BYTES_PER_SAMPLE, DEFAULT_FILE_NAME, DEFAULT_PALETTE, DEFAULT_SCALE_FACTOR, INTENSITY_RANGE,
    VERSION,
};

// Re-export external types commonly used in tests
pub use std::path::Path;
