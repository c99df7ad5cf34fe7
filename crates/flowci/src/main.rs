// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! flowci - resource resolution and plugin registry access.
//!
//! This is the binary entry point for the `flowci` command.

mod plugin;
mod resolve;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};
use flowci_resource::SystemProperties;
use tracing_subscriber::{reload, EnvFilter, Registry};

use crate::plugin::PluginCommand;
use crate::resolve::ResolveArgs;

/// flowci - resource resolution and plugin registry access.
#[derive(Parser, Debug)]
#[command(name = "flowci", version, about, long_about = None)]
struct Cli {
    /// Define a property consulted by resolvers (repeatable).
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", global = true)]
    defines: Vec<String>,

    /// Log at debug level regardless of the configured level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a resource through the five-source fallback chain.
    Resolve(ResolveArgs),
    /// Read and update the plugin registry.
    Plugin {
        #[command(subcommand)]
        command: PluginCommand,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config lookup logs too, so tracing starts before the level is known.
    let filter = init_tracing(startup_level(cli.verbose));

    let mut properties = SystemProperties::new();
    if let Err(e) = properties.apply_defines(&cli.defines) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let loaded = match flowci_config::load_and_validate(&properties) {
        Ok(loaded) => loaded,
        Err(errors) => {
            flowci_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        "debug"
    } else {
        loaded.config.log.level.as_str()
    };
    if let Err(e) = filter.reload(env_filter(level)) {
        eprintln!("warning: could not apply log level `{level}`: {e}");
    }
    if let Some(source) = &loaded.source {
        tracing::debug!(location = %source, "configuration loaded");
    }

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Resolve(args) => {
            resolve::run_resolve(&loaded.config, &properties, &args, &mut stdout)
        }
        Commands::Plugin { command } => {
            plugin::run_plugin(&loaded.config.plugin, command, &mut stdout).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Level used while the configuration itself is being located.
fn startup_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// `RUST_LOG` wins when set; otherwise flowci crates log at `log_level` and
/// everything else at `warn`.
fn env_filter(log_level: &str) -> EnvFilter {
    let level = log_level.to_ascii_lowercase();
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flowci={level},warn")))
}

/// Initialize the tracing subscriber with a reloadable env filter.
///
/// Output goes to stderr so command output on stdout stays machine-readable.
/// The returned handle swaps in the configured level once it is known.
fn init_tracing(log_level: &str) -> reload::Handle<EnvFilter, Registry> {
    use tracing_subscriber::prelude::*;

    let (filter, handle) = reload::Layer::new(env_filter(log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
    handle
}
