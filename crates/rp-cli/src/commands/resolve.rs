//! Handler for `rp resolve`.

use miette::Result;

use rp_ops::ops_resolve::{self, ResolveOptions};
use rp_util::errors::RpError;

pub fn exec(opts: ResolveOptions) -> Result<()> {
    if let Some(manifest) = &opts.manifest {
        if !manifest.is_file() {
            return Err(RpError::Generic {
                message: format!("No package descriptor found at {}", manifest.display()),
            }
            .into());
        }
    }
    ops_resolve::resolve(&opts)
}
