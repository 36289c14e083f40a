// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lxd-image")]
#[command(about = "Fetch images from the image service and register them with LXD")]
#[command(version)]
pub struct Cli {
    /// Config file (default: discovered in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a template lxd-image.yml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Make sure an image is downloaded, uploaded to LXD and aliased
    Fetch {
        /// Alias name for the image
        #[arg(long)]
        name: String,

        /// Image reference in the image service
        #[arg(long)]
        reference: String,

        /// Instance UUID, for log correlation
        #[arg(long)]
        instance: Option<String>,
    },

    /// Print where an image is cached on disk
    Path {
        /// Alias name for the image
        #[arg(long)]
        name: String,

        /// Image reference in the image service
        #[arg(long)]
        reference: String,
    },

    /// Show LXD daemon info and image aliases
    Status,
}
