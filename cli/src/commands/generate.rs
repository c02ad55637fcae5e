//! Build a configuration from scratch.

use super::common;
use clap::Args;
use std::path::PathBuf;
use warp_mdm_core::{FieldValue, Result, Session};

#[derive(Args)]
pub struct GenerateArgs {
    /// Organization (team) name, repeat for a multi-organization file
    #[arg(long = "org", required = true)]
    pub orgs: Vec<String>,

    /// Display name, paired with --org by position
    #[arg(long = "display-name")]
    pub display_names: Vec<String>,

    /// Give each organization a fresh unique_client_id
    #[arg(long)]
    pub generate_client_id: bool,

    /// Settings file (defaults to the user config location)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write to the output location from settings
    #[arg(long, conflicts_with = "output")]
    pub install: bool,

    /// Write even when validation fails
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let settings = common::load_settings(args.settings.as_deref())?;
    let mut session = Session::with_defaults(&settings);

    for (index, name) in args.orgs.iter().enumerate() {
        if index > 0 {
            session.add_organization();
        }

        let mut edits = vec![("organization", FieldValue::Text(name.clone()))];
        if let Some(display_name) = args.display_names.get(index) {
            edits.push(("display_name", FieldValue::Text(display_name.clone())));
        }

        for (key, value) in edits {
            if let Some(message) = session.set_field(index, key, value)? {
                eprintln!("warning: {} ({}): {}", key, name, message);
            }
        }
        if args.generate_client_id {
            session.generate_client_id(index)?;
        }
    }

    let result = session.validation();
    common::report(&result);
    common::ensure_exportable(&result, args.force)?;
    let output = match (args.output, args.install) {
        (Some(path), _) => Some(path),
        (None, true) => Some(settings.output_path()),
        (None, false) => None,
    };
    common::emit(&session, output.as_deref())
}
