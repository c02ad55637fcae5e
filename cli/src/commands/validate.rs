//! Import a file and report on it.

use super::common;
use clap::Args;
use std::path::PathBuf;
use warp_mdm_core::Result;

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the mdm.xml file
    pub file: PathBuf,
}

/// Run the validate command. Returns whether the configuration is exportable.
pub fn run(args: ValidateArgs) -> Result<bool> {
    let session = common::open_session(&args.file)?;
    let result = session.validation();
    common::report(&result);

    if result.valid {
        println!(
            "{}: valid ({} organization(s), {} warning(s))",
            args.file.display(),
            session.config().organizations.len(),
            result.warnings.len()
        );
    } else {
        println!(
            "{}: invalid ({} error(s), {} warning(s))",
            args.file.display(),
            result.errors.len(),
            result.warnings.len()
        );
    }
    Ok(result.valid)
}
