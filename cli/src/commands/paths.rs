//! Per-platform install locations.

use warp_mdm_core::{Platform, Result};

pub fn run() -> Result<()> {
    for platform in Platform::ALL {
        println!("{:<8} {}", platform.as_str(), platform.install_path());
    }
    Ok(())
}
