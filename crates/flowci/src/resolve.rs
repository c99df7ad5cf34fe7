// SPDX-FileCopyrightText: 2026 Flowci Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `flowci resolve` command implementation.

use std::io::Write;

use clap::Args;
use flowci_config::FlowciConfig;
use flowci_core::FlowError;
use flowci_resource::{ResourceConfig, SystemProperties};

/// Source overrides for `flowci resolve`; unset flags keep the `[resource]` config.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Environment variable holding a path.
    #[arg(long = "env", value_name = "NAME")]
    pub env: Option<String>,

    /// Property holding a path (see `-D`).
    #[arg(long, value_name = "NAME")]
    pub property: Option<String>,

    /// Literal path probed directly.
    #[arg(long, value_name = "PATH")]
    pub default_dir: Option<String>,

    /// Entry looked up under the configured search roots.
    #[arg(long, value_name = "NAME")]
    pub classpath: Option<String>,

    /// Fallback entry looked up under the configured search roots.
    #[arg(long = "default", value_name = "NAME")]
    pub default: Option<String>,

    /// Print the resolved contents after its location.
    #[arg(long)]
    pub print: bool,
}

impl ResolveArgs {
    fn lookup(&self) -> ResourceConfig {
        ResourceConfig {
            env_name: self.env.clone(),
            property_name: self.property.clone(),
            default_dir: self.default_dir.clone(),
            classpath: self.classpath.clone(),
            default: self.default.clone(),
        }
    }
}

/// Run `flowci resolve`.
///
/// Writes `<location> [<source>]` for the winning source. Nothing resolving
/// is an error so the process exits non-zero.
pub fn run_resolve(
    config: &FlowciConfig,
    defines: &SystemProperties,
    args: &ResolveArgs,
    out: &mut impl Write,
) -> Result<(), FlowError> {
    let resolver = config.resource_resolver(&args.lookup(), defines);
    let resource = resolver.require()?;

    writeln!(out, "{resource}").map_err(|e| FlowError::io("writing output", e))?;
    if args.print {
        let content = resource.read_to_string()?;
        out.write_all(content.as_bytes())
            .map_err(|e| FlowError::io("writing output", e))?;
        if !content.ends_with('\n') {
            writeln!(out).map_err(|e| FlowError::io("writing output", e))?;
        }
    }
    Ok(())
}
