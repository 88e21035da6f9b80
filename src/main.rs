use console_video_player::{
    load_video, Cli, FrameConverter, Player, PlayerConfig, Quantizer, Renderer, VERSION,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the frames
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = cli.validate() {
        error!("Invalid arguments: {}", e);
        std::process::exit(1);
    }

    let config = PlayerConfig::from_env().context("Failed to load configuration")?;
    let palette = config.palette().context("Failed to build palette")?;

    info!("Starting Console Video Player v{}", VERSION);
    info!("Playing: {}", cli.file_path.display());

    let frames = load_video(&cli.file_path, &config)
        .with_context(|| format!("Failed to load video '{}'", cli.file_path.display()))?;

    let (video_width, video_height) = frames.decoder().dimensions();
    let (text_width, text_height) = frames.decoder().target_dimensions();
    match frames.decoder().frame_rate() {
        Ok(fps) => info!(
            "Video info: {}x{} at {:.2} FPS, drawing {}x{} characters",
            video_width, video_height, fps, text_width, text_height
        ),
        Err(e) => warn!("Could not read frame rate: {}", e),
    }

    let mut player = Player::new(FrameConverter::new(Quantizer::new(palette)), Renderer::stdout());
    let frame_count = player.play(frames).context("Playback failed")?;

    info!("Playback finished. Total frames: {}", frame_count);
    Ok(())
}
