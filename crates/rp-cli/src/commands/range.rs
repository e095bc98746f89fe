//! Handler for `rp range`.

use miette::Result;

use rp_ops::ops_version;

pub fn exec(range: &str, other: Option<&str>) -> Result<()> {
    println!("{}", ops_version::normalize_range(range, other)?);
    Ok(())
}
