//! Re-emit a file in canonical form.

use super::common;
use clap::Args;
use std::path::PathBuf;
use warp_mdm_core::Result;

#[derive(Args)]
pub struct FormatArgs {
    /// Path to the mdm.xml file
    pub file: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write even when validation fails
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: FormatArgs) -> Result<()> {
    let session = common::open_session(&args.file)?;
    let result = session.validation();
    common::report(&result);
    common::ensure_exportable(&result, args.force)?;
    common::emit(&session, args.output.as_deref())
}
