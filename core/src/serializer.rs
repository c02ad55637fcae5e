//! mdm.xml generation from a `RootConfiguration`

use crate::model::{GLOBAL_FIELDS, ORGANIZATION_FIELDS};
use crate::plist::{self, PlistDict, PlistValue};
use crate::{AndroidAppRecord, FieldValue, OrganizationRecord, Result, RootConfiguration};
use std::fs;
use std::path::Path;

/// Render the configuration as plist XML.
///
/// A single organization is flattened into the root dict. Two or more are
/// written as a `configs` array of dicts. Absent values and empty strings
/// never produce a key.
pub fn serialize(config: &RootConfiguration) -> String {
    let root = build_root_dict(config);
    log::debug!(
        "Serializing {} organization(s), {} android app(s)",
        config.organizations.len(),
        config.android_apps.len()
    );
    plist::render_document(&root)
}

/// Build the plist tree the XML is rendered from
pub fn build_root_dict(config: &RootConfiguration) -> PlistDict {
    let mut root = PlistDict::new();

    for key in GLOBAL_FIELDS {
        if let Some(value) = config.global_value(key).and_then(to_plist) {
            root.insert(key, value);
        }
    }

    match config.organizations.as_slice() {
        [] => {}
        [single] => {
            for (key, value) in organization_dict(single).iter() {
                root.insert(key, value.clone());
            }
        }
        many => {
            let configs = many
                .iter()
                .map(|org| PlistValue::Dict(organization_dict(org)))
                .collect();
            root.insert("configs", PlistValue::Array(configs));
        }
    }

    let apps: Vec<PlistValue> = config
        .android_apps
        .iter()
        .filter(|app| !app.app_identifier.is_empty())
        .map(|app| PlistValue::Dict(android_app_dict(app)))
        .collect();
    if !apps.is_empty() {
        root.insert("android_apps", PlistValue::Array(apps));
    }

    root
}

/// One organization as a dict, keys in field-definition order
pub fn organization_dict(org: &OrganizationRecord) -> PlistDict {
    let mut dict = PlistDict::new();
    for key in ORGANIZATION_FIELDS {
        if let Some(value) = org.field_value(key).and_then(to_plist) {
            dict.insert(key, value);
        }
    }
    dict
}

fn android_app_dict(app: &AndroidAppRecord) -> PlistDict {
    let mut dict = PlistDict::new();
    dict.insert("app_identifier", PlistValue::String(app.app_identifier.clone()));
    if let Some(is_browser) = app.is_browser {
        dict.insert("is_browser", PlistValue::Boolean(is_browser));
    }
    dict
}

fn to_plist(value: FieldValue) -> Option<PlistValue> {
    match value {
        FieldValue::Text(s) if s.is_empty() => None,
        FieldValue::Text(s) => Some(PlistValue::String(s)),
        FieldValue::Integer(n) => Some(PlistValue::Integer(n)),
        FieldValue::Bool(b) => Some(PlistValue::Boolean(b)),
        FieldValue::Unset => None,
    }
}

/// Serialize and write to a file
pub fn write_to(config: &RootConfiguration, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serialize(config))?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
