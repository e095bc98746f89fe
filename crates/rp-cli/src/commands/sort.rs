//! Handler for `rp sort`.

use miette::Result;

use rp_ops::ops_version;
use rp_resolver::version::SortOrder;

pub fn exec(versions: &[String], desc: bool) -> Result<()> {
    let order = if desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    for version in ops_version::sort(versions, order)? {
        println!("{version}");
    }
    Ok(())
}
