//! Stack compiler CLI library

pub mod commands;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

/// stackc - compile stack descriptions into Kubernetes manifests
#[derive(Parser, Debug)]
#[command(name = "stackc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render every object of a stack as a Kubernetes List
    Render(commands::render::RenderArgs),
}

impl Cli {
    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Render(args) => commands::render::run(args),
        }
    }
}
