//! Browse the parameter registry.

use clap::Args;
use warp_mdm_core::registry::{
    self, ParameterDescriptor, ANDROID_APP_PARAMETERS, GLOBAL_PARAMETERS, ORGANIZATION_PARAMETERS,
};
use warp_mdm_core::{Error, Result, ServiceMode};

#[derive(Args)]
pub struct ParamsArgs {
    /// Show details for a single parameter
    pub key: Option<String>,
}

pub fn run(args: ParamsArgs) -> Result<()> {
    match args.key {
        Some(key) => {
            let descriptor = registry::describe(&key)
                .ok_or_else(|| Error::not_found(format!("Unknown parameter '{}'", key)))?;
            print_details(descriptor);
        }
        None => {
            print_table("Organization parameters", ORGANIZATION_PARAMETERS);
            println!();
            print_table("Global parameters", GLOBAL_PARAMETERS);
            println!();
            print_table("Android app parameters", ANDROID_APP_PARAMETERS);
        }
    }
    Ok(())
}

fn print_table(title: &str, descriptors: &[ParameterDescriptor]) {
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    for d in descriptors {
        let marker = if d.required { "*" } else { " " };
        println!("{} {:<24} {:<8} {}", marker, d.key, d.kind.as_str(), d.label);
    }
}

fn print_details(d: &ParameterDescriptor) {
    println!("{} ({})", d.label, d.key);
    println!();
    println!("{}", d.description);
    println!();
    println!("Type:     {}", d.kind.as_str());
    println!("Category: {}", format!("{:?}", d.category).to_lowercase());
    println!("Required: {}", if d.required { "yes" } else { "no" });
    if let Some(bounds) = d.bounds {
        println!("Range:    {}..={}", bounds.min, bounds.max);
    }
    if let Some(placeholder) = d.placeholder {
        println!("Example:  {}", placeholder);
    }
    if !d.platforms.is_empty() {
        println!("Platforms: {}", d.platforms.join(", "));
    }
    if !d.enum_options.is_empty() {
        println!("Options:");
        for option in d.enum_options {
            match ServiceMode::from_token(option.value) {
                Some(mode) => {
                    println!("  {:<12} {}", option.value, mode.display_name());
                    println!("  {:<12} {}", "", mode.description());
                }
                None => println!("  {:<12} {}", option.value, option.label),
            }
        }
    }
}
