//! Print an imported configuration as JSON.

use super::common;
use clap::Args;
use std::path::PathBuf;
use warp_mdm_core::Result;

#[derive(Args)]
pub struct ShowArgs {
    /// Path to the mdm.xml file
    pub file: PathBuf,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let session = common::open_session(&args.file)?;
    let json = serde_json::to_string_pretty(session.config())?;
    println!("{}", json);
    Ok(())
}
