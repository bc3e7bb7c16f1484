use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image_squeeze")]
#[command(about = "A tool for compressing images in batches")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress images and save the results
    Compress {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// JPEG quality (0-100); overrides the configuration file
        #[arg(short, long)]
        quality: Option<u8>,

        /// Output directory
        #[arg(short, long, default_value = "compressed")]
        output: PathBuf,

        /// Bundle all compressed images into a single ZIP archive
        #[arg(short, long)]
        archive: bool,

        /// Walk directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the files that would be uploaded
    Inspect {
        /// Image files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Walk directories recursively
        #[arg(short, long)]
        recursive: bool,
    },
}
