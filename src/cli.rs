use crate::DEFAULT_FILE_NAME;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the video file to play
    #[arg(default_value = DEFAULT_FILE_NAME)]
    pub file_path: PathBuf,
}

impl Cli {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<(), String> {
        if !self.file_path.exists() {
            return Err(format!("Video file does not exist: {}", self.file_path.display()));
        }
        Ok(())
    }
}
