// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meetsync - bridge between a chat platform and a video-conferencing
//! service.
//!
//! This is the standalone binary entry point. It serves the inbound webhook
//! surface; the chat-platform collaborators stay behind their traits.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod collaborators;
mod serve;

/// Meetsync - chat/video-conferencing bridge.
#[derive(Parser, Debug)]
#[command(name = "meetsync", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
    /// Load and validate the configuration, then exit.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            // The bridge section may legitimately be incomplete at boot; the
            // webhook surface answers 501 until a valid snapshot is
            // installed. Only a parse failure is fatal here.
            let config = match meetsync_config::load_config() {
                Ok(config) => config,
                Err(err) => {
                    meetsync_config::render_errors(
                        &meetsync_config::diagnostic::figment_to_config_errors(err),
                    );
                    std::process::exit(1);
                }
            };
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("meetsync serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match meetsync_config::load_and_validate() {
            Ok(config) => {
                println!(
                    "meetsync: configuration OK (listening on {}:{})",
                    config.server.host, config.server.port
                );
            }
            Err(errors) => {
                meetsync_config::render_errors(&errors);
                std::process::exit(1);
            }
        },
        None => {
            println!("meetsync: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }
}
