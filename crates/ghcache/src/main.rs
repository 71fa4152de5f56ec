//! ghcache - delete GitHub Actions caches from the command line.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ghcache_cmd::clean::CleanArgs;
use ghcache_cmd::factory::Factory;
use ghcache_core::cmdutil::{is_auth_error, is_flag_error};

mod exit_codes {
    pub const OK: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 4;
}

/// Delete every GitHub Actions cache of a repository or of an organization.
#[derive(Debug, Parser)]
#[command(
    name = "ghcache",
    version,
    about = "Delete GitHub Actions caches",
    long_about = "Delete every GitHub Actions cache of a repository (`repo OWNER/REPO`) \
                  or of every repository in an organization (`org OWNER`)."
)]
struct Cli {
    #[command(flatten)]
    clean: CleanArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GH_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let factory = Factory::new(env!("CARGO_PKG_VERSION").to_string());

    let exit_code = match cli.clean.run(&factory).await {
        Ok(_) => exit_codes::OK,
        Err(e) => {
            tracing::error!("{e:#}");
            if is_auth_error(&e) {
                exit_codes::AUTH
            } else if is_flag_error(&e) {
                exit_codes::USAGE
            } else {
                exit_codes::ERROR
            }
        }
    };

    std::process::exit(exit_code);
}
