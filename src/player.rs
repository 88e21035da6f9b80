use crate::converter::FrameConverter;
use crate::decoder::VideoFrame;
use crate::renderer::Renderer;
use crate::{Result, BYTES_PER_SAMPLE};
use log::{debug, info, warn};
use std::io::Write;

/// Drives frames from a source through the converter into a renderer
pub struct Player<W: Write> {
    converter: FrameConverter,
    renderer: Renderer<W>,
}

impl<W: Write> Player<W> {
    pub fn new(converter: FrameConverter, renderer: Renderer<W>) -> Self {
        Self { converter, renderer }
    }

    /// Render every frame in order, one at a time, stopping at the first error.
    ///
    /// Returns the number of frames rendered.
    pub fn play<I>(&mut self, frames: I) -> Result<u64>
    where
        I: IntoIterator<Item = Result<VideoFrame>>,
    {
        let mut count = 0u64;
        for frame in frames {
            let frame = frame?;
            self.render(&frame)?;
            count += 1;
        }
        info!("Rendered {} frames", count);
        Ok(count)
    }

    /// Render a single frame
    pub fn render(&mut self, frame: &VideoFrame) -> Result<()> {
        let expected = frame.width as usize * frame.height as usize * BYTES_PER_SAMPLE;
        if frame.data.len() != expected {
            warn!(
                "Frame {} is {}x{} but carries {} bytes instead of {}",
                frame.frame_number,
                frame.width,
                frame.height,
                frame.data.len(),
                expected
            );
        }
        if frame.data.len() % BYTES_PER_SAMPLE != 0 {
            warn!(
                "Frame {} has an odd buffer length ({}), ignoring the last byte",
                frame.frame_number,
                frame.data.len()
            );
        }
        debug!("Rendering frame {} ({}x{})", frame.frame_number, frame.width, frame.height);
        self.renderer.render_frame(self.converter.characters(frame), frame.width)?;
        Ok(())
    }

    pub fn renderer(&self) -> &Renderer<W> {
        &self.renderer
    }

    pub fn into_renderer(self) -> Renderer<W> {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerError;

    fn player() -> Player<Vec<u8>> {
        Player::new(FrameConverter::default(), Renderer::new(Vec::new()))
    }

    fn output(player: Player<Vec<u8>>) -> String {
        String::from_utf8(player.into_renderer().into_inner()).unwrap()
    }

    #[test]
    fn test_black_frame() {
        let mut player = player();
        let frame = VideoFrame::new(vec![0; 4], 2, 1, 1).unwrap();
        player.render(&frame).unwrap();
        assert_eq!(output(player), "  \n\n\n");
    }

    #[test]
    fn test_white_frame() {
        let mut player = player();
        let frame = VideoFrame::new(vec![0xFF; 4], 2, 1, 1).unwrap();
        player.render(&frame).unwrap();
        assert_eq!(output(player), "##\n\n\n");
    }

    #[test]
    fn test_frames_are_independent() {
        let bright = VideoFrame::new(vec![0xFF; 8], 2, 2, 1).unwrap();
        let dark = VideoFrame::new(vec![0x00; 4], 1, 2, 2).unwrap();

        let mut both = player();
        both.play(vec![Ok(bright.clone()), Ok(dark.clone())]).unwrap();

        let mut alone = player();
        alone.play(vec![Ok(dark)]).unwrap();

        let both = output(both);
        let alone = output(alone);
        assert_eq!(both, format!("##\n##\n\n\n{}", alone));
        assert_eq!(alone, " \n \n\n\n");
    }

    #[test]
    fn test_play_stops_at_first_error() {
        let mut player = player();
        let frames = vec![
            Ok(VideoFrame::new(vec![0; 2], 1, 1, 1).unwrap()),
            Err(PlayerError::StreamLookup(3)),
            Ok(VideoFrame::new(vec![0; 2], 1, 1, 3).unwrap()),
        ];
        let result = player.play(frames);
        assert!(matches!(result, Err(PlayerError::StreamLookup(3))));
        assert_eq!(player.renderer().frames_rendered(), 1);
    }

    #[test]
    fn test_mismatched_buffer_renders_available_samples() {
        let mut player = player();
        // Built without VideoFrame::new: 2x2 frame holding three samples and a stray byte
        let frame = VideoFrame {
            data: vec![0x00, 0x00, 0xFF, 0xFF, 0x80, 0x00, 0xFF],
            width: 2,
            height: 2,
            frame_number: 7,
        };
        player.render(&frame).unwrap();
        assert_eq!(output(player), " #\n-\n\n");
    }

    #[test]
    fn test_play_counts_frames() {
        let mut player = player();
        let frames = (1..=3).map(|n| VideoFrame::new(vec![0x80, 0x00], 1, 1, n));
        assert_eq!(player.play(frames).unwrap(), 3);
        assert_eq!(output(player), "-\n\n\n".repeat(3));
    }
}
