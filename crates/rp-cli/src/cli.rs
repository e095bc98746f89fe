//! CLI argument definitions for rp.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rp_core::mode::{Compatibility, ResolutionMode};

#[derive(Parser, Debug)]
#[command(
    name = "rp",
    version,
    about = "Package resolver for the ringo package catalog",
    long_about = "rp resolves a package and its transitive dependencies against a package \
                  catalog, and answers questions about versions and ranges."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of ~/.rp/config.toml
    #[arg(long, global = true, env = "RP_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a package and its dependencies
    Resolve {
        /// Package name
        name: Option<String>,
        /// Version range (defaults to the latest version)
        range: Option<String>,
        /// Resolve the dependencies of a local package.json instead
        #[arg(long, conflicts_with = "name")]
        manifest: Option<PathBuf>,
        /// Conflict strategy: strict, latest-compatible
        #[arg(long)]
        mode: Option<ResolutionMode>,
        /// Compatibility rule: same-major, leading-non-zero
        #[arg(long)]
        compatibility: Option<Compatibility>,
        /// Catalog file to resolve against
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Host engine version checked against package engine ranges.
        /// Without one (here or in [engine] of the config) engine ranges are not checked
        #[arg(long)]
        engine_version: Option<String>,
        /// Print the dependency tree
        #[arg(long)]
        tree: bool,
        /// Maximum tree depth
        #[arg(long, requires = "tree")]
        depth: Option<usize>,
        /// Print the packages depending on this one
        #[arg(long)]
        invert: Option<String>,
        /// Explain why a package is part of the resolution
        #[arg(long)]
        why: Option<String>,
        /// Print the version conflicts settled during resolution
        #[arg(long)]
        conflicts: bool,
        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a version lies within a range
    Satisfies {
        /// Version to check
        version: String,
        /// Range expression
        range: String,
    },

    /// Sort versions, lowest first
    Sort {
        /// Sort highest first
        #[arg(long)]
        desc: bool,
        /// Versions to sort
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Print the normalized form of a range, or the intersection of two
    Range {
        /// Range expression
        range: String,
        /// Range to intersect with
        other: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
