//! Shared CLI helpers used across multiple commands.

use std::fs;
use std::path::Path;
use warp_mdm_core::{serializer, Error, Result, Session, Settings, ValidationResult};

/// Load settings from an explicit path, else from the default location
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default()?,
    };
    settings.validate()?;
    Ok(settings)
}

/// Import a file into a fresh session, printing import warnings
pub fn open_session(path: &Path) -> Result<Session> {
    let content = fs::read_to_string(path)?;
    let mut session = Session::new();
    let warnings = session.import(&content)?;
    print_warnings(&warnings);
    Ok(session)
}

pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

/// Print validation errors and warnings to stderr
pub fn report(result: &ValidationResult) {
    for error in &result.errors {
        eprintln!("error: {}", error);
    }
    print_warnings(&result.warnings);
}

/// Refuse to write an invalid configuration unless forced
pub fn ensure_exportable(result: &ValidationResult, force: bool) -> Result<()> {
    if result.valid || force {
        return Ok(());
    }
    Err(Error::validation(format!(
        "configuration has {} error(s), use --force to write it anyway",
        result.errors.len()
    )))
}

/// Write the session's configuration to a file, or to stdout without one
pub fn emit(session: &Session, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            serializer::write_to(session.config(), path)?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", session.export()),
    }
    Ok(())
}
