//! Command dispatch and handler modules.

mod range;
mod resolve;
mod satisfies;
mod sort;

use miette::Result;

use rp_ops::ops_resolve::ResolveOptions;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    tracing::debug!("dispatching {:?}", cli.command);
    match cli.command {
        Command::Resolve {
            name,
            range,
            manifest,
            mode,
            compatibility,
            catalog,
            engine_version,
            tree,
            depth,
            invert,
            why,
            conflicts,
            json,
        } => resolve::exec(ResolveOptions {
            name,
            range,
            manifest,
            mode,
            compatibility,
            catalog,
            engine_version,
            config: cli.config,
            tree,
            depth,
            invert,
            why,
            conflicts,
            json,
        }),
        Command::Satisfies { version, range } => satisfies::exec(&version, &range),
        Command::Sort { desc, versions } => sort::exec(&versions, desc),
        Command::Range { range, other } => range::exec(&range, other.as_deref()),
    }
}
