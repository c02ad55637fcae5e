//! Edit one parameter of an existing file in place.

use super::common;
use clap::Args;
use std::path::PathBuf;
use warp_mdm_core::registry::{self, ValueKind};
use warp_mdm_core::{Error, FieldValue, Result};

#[derive(Args)]
pub struct SetArgs {
    /// Path to the mdm.xml file
    pub file: PathBuf,

    /// Parameter key (e.g. auto_connect)
    pub key: String,

    /// New value; omit together with --unset to clear the parameter
    pub value: Option<String>,

    /// Organization number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub org: usize,

    /// Edit a global parameter instead of an organization one
    #[arg(long)]
    pub global: bool,

    /// Clear the parameter
    #[arg(long, conflicts_with = "value")]
    pub unset: bool,

    /// Write even when validation fails
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: SetArgs) -> Result<()> {
    let value = match (&args.value, args.unset) {
        (_, true) => FieldValue::Unset,
        (Some(raw), false) => parse_value(&args.key, raw)?,
        (None, false) => {
            return Err(Error::field(format!(
                "A value for '{}' is required (or pass --unset)",
                args.key
            )))
        }
    };

    let mut session = common::open_session(&args.file)?;
    let message = if args.global {
        session.set_global(&args.key, value)?
    } else {
        let index = args
            .org
            .checked_sub(1)
            .ok_or_else(|| Error::field("Organization numbers start at 1"))?;
        session.set_field(index, &args.key, value)?
    };
    if let Some(message) = message {
        eprintln!("warning: {}: {}", args.key, message);
    }

    let result = session.validation();
    common::report(&result);
    common::ensure_exportable(&result, args.force)?;
    common::emit(&session, Some(&args.file))
}

/// Convert command-line text into the value kind the registry declares
pub fn parse_value(key: &str, raw: &str) -> Result<FieldValue> {
    let descriptor = registry::describe(key)
        .ok_or_else(|| Error::field(format!("Unknown parameter '{}'", key)))?;

    match descriptor.kind {
        ValueKind::Integer => raw
            .trim()
            .parse()
            .map(FieldValue::Integer)
            .map_err(|_| Error::field(format!("'{}' expects an integer, got '{}'", key, raw))),
        ValueKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(FieldValue::Bool(true)),
            "false" | "no" | "0" => Ok(FieldValue::Bool(false)),
            _ => Err(Error::field(format!(
                "'{}' expects true or false, got '{}'",
                key, raw
            ))),
        },
        ValueKind::String | ValueKind::Enum => Ok(FieldValue::Text(raw.to_string())),
    }
}
