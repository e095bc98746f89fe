//! Handler for `rp satisfies`.

use miette::Result;

use rp_ops::ops_version;

/// Prints `true` or `false`; a version outside the range exits with status 1.
pub fn exec(version: &str, range: &str) -> Result<()> {
    let matched = ops_version::satisfies(version, range)?;
    println!("{matched}");
    if !matched {
        std::process::exit(1);
    }
    Ok(())
}
