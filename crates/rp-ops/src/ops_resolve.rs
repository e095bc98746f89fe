//! Operation: resolve a package (or a local package's dependencies) against
//! the catalog.

use std::path::PathBuf;

use miette::Diagnostic;

use rp_core::config::GlobalConfig;
use rp_core::descriptor::PackageDescriptor;
use rp_core::mode::{Compatibility, ResolutionMode};
use rp_registry::CatalogRegistry;
use rp_resolver::conflict::ConflictReport;
use rp_resolver::engine::HostEngine;
use rp_resolver::graph::ResolutionGraph;
use rp_resolver::{ResolveError, Resolver};
use rp_util::errors::RpError;
use rp_util::progress;

/// Options for `rp resolve`. Unset values fall back to the global config.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Root package to resolve.
    pub name: Option<String>,
    /// Range for the root package; latest when unset.
    pub range: Option<String>,
    /// Local `package.json` whose dependencies are resolved instead of a root.
    pub manifest: Option<PathBuf>,
    pub mode: Option<ResolutionMode>,
    pub compatibility: Option<Compatibility>,
    pub catalog: Option<PathBuf>,
    pub engine_version: Option<String>,
    /// Config file to read instead of `~/.rp/config.toml`.
    pub config: Option<PathBuf>,
    /// Print the dependency tree.
    pub tree: bool,
    /// Maximum tree depth.
    pub depth: Option<usize>,
    /// Print who depends on this package instead of the tree below the root.
    pub invert: Option<String>,
    /// Explain why this package is part of the resolution.
    pub why: Option<String>,
    /// Print the conflict report.
    pub conflicts: bool,
    /// Print JSON instead of `name version` lines.
    pub json: bool,
}

/// A finished resolution run.
pub struct Resolution {
    /// The package the run started from.
    pub root: String,
    pub mode: ResolutionMode,
    pub packages: Vec<PackageDescriptor>,
    pub report: ConflictReport,
    pub graph: ResolutionGraph,
}

fn resolution_error(e: ResolveError) -> RpError {
    RpError::Resolution {
        message: e.to_string(),
        help: e.help().map(|help| help.to_string()),
    }
}

fn load_config(opts: &ResolveOptions) -> GlobalConfig {
    let loaded = match &opts.config {
        Some(path) => GlobalConfig::load_from(path),
        None => GlobalConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Failed to load global config, using defaults: {e}");
        GlobalConfig::default()
    })
}

/// Resolve the requested root without printing anything.
pub fn resolve_packages(opts: &ResolveOptions) -> miette::Result<Resolution> {
    let config = load_config(opts);
    let mode = opts.mode.unwrap_or(config.resolver.mode);
    let compatibility = opts
        .compatibility
        .unwrap_or(config.registry.compatibility);
    let catalog_path = opts
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog_path());

    let registry = CatalogRegistry::load(&catalog_path)?.with_compatibility(compatibility);

    let engine = match opts.engine_version.as_ref().or(config.engine.version.as_ref()) {
        Some(version) => Some(HostEngine::new(&config.engine.name, version).map_err(|e| {
            RpError::Config {
                message: format!("Invalid engine version: {e}"),
            }
        })?),
        None => {
            progress::status_warn(
                "Warning",
                "no engine version configured, package engine ranges are not checked",
            );
            None
        }
    };

    let mut resolver = Resolver::new(&registry, mode);
    if let Some(engine) = &engine {
        tracing::debug!("checking engines against {} {}", engine.name(), engine.version());
        resolver = resolver.with_engine(engine);
    }

    let root = match (&opts.manifest, &opts.name) {
        (Some(path), _) => {
            let local = PackageDescriptor::from_path(path)?;
            progress::status("Resolving", &format!("dependencies of {local} ({mode})"));
            resolver
                .resolve_dependencies(&local)
                .map_err(resolution_error)?;
            local.name
        }
        (None, Some(name)) => {
            progress::status(
                "Resolving",
                &format!("{name} {} ({mode})", opts.range.as_deref().unwrap_or("latest")),
            );
            resolver
                .resolve(name, opts.range.as_deref())
                .map_err(resolution_error)?;
            name.clone()
        }
        (None, None) => {
            return Err(RpError::Generic {
                message: "Specify a package name or --manifest".to_string(),
            }
            .into())
        }
    };

    let graph = ResolutionGraph::from_resolver(&resolver);
    let report = resolver.report().clone();
    Ok(Resolution {
        root,
        mode,
        packages: resolver.into_descriptors(),
        report,
        graph,
    })
}

/// Resolve and print the result.
pub fn resolve(opts: &ResolveOptions) -> miette::Result<()> {
    let resolution = resolve_packages(opts)?;

    if opts.json {
        let output = serde_json::json!({
            "root": resolution.root,
            "mode": resolution.mode.to_string(),
            "packages": resolution.packages,
            "conflicts": resolution.report.conflicts,
        });
        let text = serde_json::to_string_pretty(&output).map_err(|e| RpError::Generic {
            message: format!("Failed to serialize resolution: {e}"),
        })?;
        println!("{text}");
        return Ok(());
    }

    for package in &resolution.packages {
        println!("{package}");
    }

    if opts.tree {
        println!();
        print!("{}", resolution.graph.print_tree(&resolution.root, opts.depth));
        for cycle in resolution.graph.cycles() {
            progress::status_info("Cycle", &cycle.join(" -> "));
        }
    }

    if let Some(name) = &opts.invert {
        println!();
        print!("{}", resolution.graph.print_inverted_tree(name));
    }

    if let Some(name) = &opts.why {
        explain(&resolution, name);
    }

    if opts.conflicts {
        println!();
        println!("{}", resolution.report);
    }

    progress::status(
        "Resolved",
        &format!("{} packages", resolution.packages.len()),
    );
    Ok(())
}

fn explain(resolution: &Resolution, name: &str) {
    match resolution.graph.find_path(&resolution.root, name) {
        Some(path) => {
            let chain: Vec<String> = path.iter().map(|node| node.to_string()).collect();
            println!();
            println!("{}", chain.join(" -> "));
        }
        None => progress::status_warn(
            "Warning",
            &format!("{name} is not a dependency of {}", resolution.root),
        ),
    }
}
