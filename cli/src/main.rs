//! WARP MDM CLI - build, import and validate mdm.xml files.

mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "warp-mdm")]
#[command(author, version, about = "WARP MDM configuration generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a file and report warnings and validation results
    Validate(commands::validate::ValidateArgs),

    /// Re-emit a file as canonical mdm.xml
    Format(commands::format::FormatArgs),

    /// Print the imported configuration as JSON
    Show(commands::show::ShowArgs),

    /// Build a new configuration from organization names
    Generate(commands::generate::GenerateArgs),

    /// Change a single parameter in an existing file
    Set(commands::set::SetArgs),

    /// List recognized parameters or describe one
    Params(commands::params::ParamsArgs),

    /// Print where the WARP client expects mdm.xml on each platform
    Paths,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Format(args) => commands::format::run(args).map(|()| true),
        Commands::Show(args) => commands::show::run(args).map(|()| true),
        Commands::Generate(args) => commands::generate::run(args).map(|()| true),
        Commands::Set(args) => commands::set::run(args).map(|()| true),
        Commands::Params(args) => commands::params::run(args).map(|()| true),
        Commands::Paths => commands::paths::run().map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
