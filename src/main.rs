//! stackc
//!
//! CLI for compiling stack descriptions into Kubernetes manifests.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stack_compiler::{Cli, Result};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the rendered manifests
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
