//! Tolerant mdm.xml import
//!
//! Only a broken document skeleton is fatal. Every field-level problem is
//! reported as a warning and parsing carries on.

use crate::plist::{self, PlistDict, PlistValue};
use crate::registry::{self, AUTO_CONNECT_BOUNDS};
use crate::{
    AndroidAppRecord, ImportError, OrganizationRecord, Result, RootConfiguration, ServiceMode,
};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub config: RootConfiguration,
    pub warnings: Vec<String>,
}

/// Parse plist XML into a configuration.
///
/// The returned configuration may hold no organization at all, for instance
/// when every `configs` entry lacked an identifier.
pub fn parse(xml: &str) -> std::result::Result<ImportResult, ImportError> {
    let mut warnings = Vec::new();
    let root = plist::read_document(xml, &mut warnings)?;

    let mut config = RootConfiguration::empty();

    match root.get("configs") {
        Some(PlistValue::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let org = match entry {
                    PlistValue::Dict(dict) => {
                        for key in dict.keys() {
                            if !registry::is_organization_key(key) {
                                warnings.push(format!(
                                    "Unknown parameter '{}' in organization #{} was skipped",
                                    key,
                                    index + 1
                                ));
                            }
                        }
                        parse_organization(dict, &mut warnings)
                    }
                    other => {
                        warnings.push(format!(
                            "Entry of type {} in 'configs' was skipped",
                            other.kind_name()
                        ));
                        continue;
                    }
                };
                if org.organization.is_empty() {
                    continue;
                }
                config.organizations.push(org);
            }

            for key in root.keys() {
                if key != "configs" && !is_known_root_key(key) {
                    warnings.push(format!("Unknown parameter '{}' at root level was skipped", key));
                }
            }
        }
        _ => {
            if root.keys().any(registry::is_organization_key) {
                config.organizations.push(parse_organization(&root, &mut warnings));
            }

            for key in root.keys() {
                if !is_known_root_key(key) && !registry::is_organization_key(key) {
                    warnings.push(format!("Unknown parameter '{}' was skipped", key));
                }
            }
        }
    }

    config.multi_user = root.get("multi_user").map(PlistValue::as_bool);
    config.pre_login = root.get("pre_login").map(PlistValue::as_bool);

    if let Some(value) = root.get("android_apps") {
        config.android_apps = parse_android_apps(value, &mut warnings);
    }

    for warning in &warnings {
        log::warn!("Import: {}", warning);
    }
    log::debug!(
        "Imported {} organization(s), {} android app(s), {} warning(s)",
        config.organizations.len(),
        config.android_apps.len(),
        warnings.len()
    );

    Ok(ImportResult { config, warnings })
}

/// Read and parse a file
pub fn parse_file(path: &Path) -> Result<ImportResult> {
    let content = fs::read_to_string(path)?;
    Ok(parse(&content)?)
}

fn is_known_root_key(key: &str) -> bool {
    registry::is_global_key(key) || key == "android_apps"
}

/// Extract one organization from a dict. Also used on the root dict of a
/// single-organization file, where global keys are simply not looked at.
fn parse_organization(data: &PlistDict, warnings: &mut Vec<String>) -> OrganizationRecord {
    let mut org = OrganizationRecord::default();

    match data.get("organization") {
        Some(PlistValue::String(name)) => org.organization = name.clone(),
        _ => warnings.push("Missing or invalid required field: organization".to_string()),
    }

    let text = |key: &str, warnings: &mut Vec<String>| -> Option<String> {
        let value = data.get(key)?;
        let coerced = value.as_text();
        if coerced.is_none() {
            warnings.push(format!(
                "Invalid value for '{}': expected a string, found {}",
                key,
                value.kind_name()
            ));
        }
        coerced
    };

    org.display_name = text("display_name", warnings);
    org.auth_client_id = text("auth_client_id", warnings);
    org.auth_client_secret = text("auth_client_secret", warnings);
    org.support_url = text("support_url", warnings);
    org.override_api_endpoint = text("override_api_endpoint", warnings);
    org.override_doh_endpoint = text("override_doh_endpoint", warnings);
    org.override_warp_endpoint = text("override_warp_endpoint", warnings);

    // Kept as-is when malformed; the validator decides whether it blocks export
    org.gateway_unique_id = text("gateway_unique_id", warnings);
    if let Some(id) = &org.gateway_unique_id {
        if !UUID_RE.is_match(id) {
            warnings.push(format!("Invalid UUID format for 'gateway_unique_id': {}", id));
        }
    }
    org.unique_client_id = text("unique_client_id", warnings);
    if let Some(id) = &org.unique_client_id {
        if !UUID_RE.is_match(id) {
            warnings.push(format!("Invalid UUID format for 'unique_client_id': {}", id));
        }
    }

    if let Some(value) = data.get("auto_connect") {
        match value.as_integer() {
            Some(minutes) if AUTO_CONNECT_BOUNDS.contains(minutes) => {
                org.auto_connect = Some(minutes)
            }
            Some(minutes) => warnings.push(format!(
                "Invalid value for 'auto_connect': {} (must be 0-1440 minutes)",
                minutes
            )),
            None => warnings.push(format!(
                "Invalid value for 'auto_connect': expected an integer, found {}",
                value.kind_name()
            )),
        }
    }

    if let Some(value) = data.get("proxy_port") {
        match value.as_integer() {
            Some(port) => org.proxy_port = Some(port),
            None => warnings.push(format!(
                "Invalid value for 'proxy_port': expected an integer, found {}",
                value.kind_name()
            )),
        }
    }

    org.onboarding = data.get("onboarding").map(PlistValue::as_bool);
    org.switch_locked = data.get("switch_locked").map(PlistValue::as_bool);
    org.enable_post_quantum = data.get("enable_post_quantum").map(PlistValue::as_bool);

    if let Some(token) = text("service_mode", warnings) {
        match ServiceMode::from_token(&token) {
            Some(mode) => org.service_mode = Some(mode),
            None => warnings.push(format!("Invalid value for 'service_mode': {}", token)),
        }
    }

    org
}

fn parse_android_apps(value: &PlistValue, warnings: &mut Vec<String>) -> Vec<AndroidAppRecord> {
    let Some(entries) = value.as_array() else {
        warnings.push(format!(
            "Invalid value for 'android_apps': expected an array, found {}",
            value.kind_name()
        ));
        return Vec::new();
    };

    let mut apps = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let label = format!("Android App #{}", index + 1);
        let Some(dict) = entry.as_dict() else {
            warnings.push(format!("{}: expected a dict, entry was skipped", label));
            continue;
        };

        for key in dict.keys() {
            if !registry::is_android_app_key(key) {
                warnings.push(format!("{}: unknown parameter '{}' was skipped", label, key));
            }
        }

        match dict.get("app_identifier") {
            Some(PlistValue::String(id)) if !id.is_empty() => apps.push(AndroidAppRecord {
                app_identifier: id.clone(),
                is_browser: dict.get("is_browser").map(PlistValue::as_bool),
            }),
            _ => warnings.push(format!(
                "{}: missing or invalid app_identifier, entry was skipped",
                label
            )),
        }
    }
    apps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\"><dict>{}</dict></plist>",
            body
        )
    }

    #[test]
    fn test_parse_single_org() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string>\
             <key>auto_connect</key><integer>30</integer>\
             <key>switch_locked</key><true/>\
             <key>service_mode</key><string>1dot1</string>\
             <key>pre_login</key><false/>",
        ))
        .unwrap();

        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        let config = result.config;
        assert_eq!(config.organizations.len(), 1);
        let org = &config.organizations[0];
        assert_eq!(org.organization, "acme");
        assert_eq!(org.auto_connect, Some(30));
        assert_eq!(org.switch_locked, Some(true));
        assert_eq!(org.service_mode, Some(ServiceMode::DnsOnly));
        assert_eq!(config.pre_login, Some(false));
        assert_eq!(config.multi_user, None);
    }

    #[test]
    fn test_parse_multi_org_drops_unnamed() {
        let result = parse(&wrap(
            "<key>multi_user</key><true/>\
             <key>configs</key><array>\
               <dict><key>organization</key><string>acme</string><key>display_name</key><string>Acme</string></dict>\
               <dict><key>display_name</key><string>No Name</string></dict>\
               <dict><key>organization</key><string>beta</string><key>colour</key><string>red</string></dict>\
             </array>",
        ))
        .unwrap();

        let names: Vec<_> = result
            .config
            .organizations
            .iter()
            .map(|o| o.organization.as_str())
            .collect();
        assert_eq!(names, vec!["acme", "beta"]);
        assert_eq!(result.config.multi_user, Some(true));
        assert!(result
            .warnings
            .contains(&"Missing or invalid required field: organization".to_string()));
        assert!(result
            .warnings
            .contains(&"Unknown parameter 'colour' in organization #3 was skipped".to_string()));
    }

    #[test]
    fn test_multi_org_root_keys_checked() {
        let result = parse(&wrap(
            "<key>configs</key><array><dict><key>organization</key><string>a</string></dict></array>\
             <key>organization</key><string>stray</string>",
        ))
        .unwrap();
        assert_eq!(
            result.warnings,
            vec!["Unknown parameter 'organization' at root level was skipped".to_string()]
        );
        assert_eq!(result.config.organizations.len(), 1);
    }

    #[test]
    fn test_unknown_key_warns() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string><key>foo_bar</key><string>x</string>",
        ))
        .unwrap();
        assert_eq!(
            result.warnings,
            vec!["Unknown parameter 'foo_bar' was skipped".to_string()]
        );
        assert_eq!(result.config.organizations[0].organization, "acme");
    }

    #[test]
    fn test_globals_only_has_no_org() {
        let result = parse(&wrap("<key>multi_user</key><false/>")).unwrap();
        assert!(result.config.organizations.is_empty());
        assert_eq!(result.config.multi_user, Some(false));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_single_org_without_name_is_kept() {
        let result = parse(&wrap("<key>auto_connect</key><integer>5</integer>")).unwrap();
        assert_eq!(result.config.organizations.len(), 1);
        assert_eq!(result.config.organizations[0].organization, "");
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_auto_connect_out_of_range_dropped() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string><key>auto_connect</key><integer>9999</integer>",
        ))
        .unwrap();
        let org = &result.config.organizations[0];
        assert_eq!(org.auto_connect, None);
        assert_eq!(org.organization, "acme");
        assert_eq!(
            result.warnings,
            vec!["Invalid value for 'auto_connect': 9999 (must be 0-1440 minutes)".to_string()]
        );
    }

    #[test]
    fn test_invalid_service_mode_dropped() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string><key>service_mode</key><string>tunnel</string>",
        ))
        .unwrap();
        assert_eq!(result.config.organizations[0].service_mode, None);
        assert_eq!(
            result.warnings,
            vec!["Invalid value for 'service_mode': tunnel".to_string()]
        );
    }

    #[test]
    fn test_uuid_fields_kept_but_flagged() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string>\
             <key>unique_client_id</key><string>not-a-uuid</string>\
             <key>gateway_unique_id</key><string>496C6124-DB89-4735-BC4E-7F759109A6F1</string>",
        ))
        .unwrap();
        let org = &result.config.organizations[0];
        assert_eq!(org.unique_client_id.as_deref(), Some("not-a-uuid"));
        assert_eq!(
            result.warnings,
            vec!["Invalid UUID format for 'unique_client_id': not-a-uuid".to_string()]
        );
    }

    #[test]
    fn test_malformed_gateway_id_kept_but_flagged() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string>\
             <key>gateway_unique_id</key><string>abc123</string>",
        ))
        .unwrap();
        let org = &result.config.organizations[0];
        assert_eq!(org.gateway_unique_id.as_deref(), Some("abc123"));
        assert_eq!(
            result.warnings,
            vec!["Invalid UUID format for 'gateway_unique_id': abc123".to_string()]
        );
    }

    #[test]
    fn test_type_coercion() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string>\
             <key>display_name</key><integer>42</integer>\
             <key>proxy_port</key><string>8080</string>\
             <key>onboarding</key><integer>0</integer>\
             <key>support_url</key><array/>",
        ))
        .unwrap();
        let org = &result.config.organizations[0];
        assert_eq!(org.display_name.as_deref(), Some("42"));
        assert_eq!(org.proxy_port, Some(8080));
        assert_eq!(org.onboarding, Some(false));
        assert_eq!(org.support_url, None);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_non_numeric_integer_is_tolerated() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string><key>proxy_port</key><integer>http</integer>",
        ))
        .unwrap();
        assert_eq!(result.config.organizations[0].proxy_port, None);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_android_apps() {
        let result = parse(&wrap(
            "<key>organization</key><string>acme</string>\
             <key>android_apps</key><array>\
               <dict><key>app_identifier</key><string>com.android.chrome</string><key>is_browser</key><true/></dict>\
               <dict><key>is_browser</key><false/></dict>\
               <dict><key>app_identifier</key><string>com.slack</string><key>vpn</key><true/></dict>\
             </array>",
        ))
        .unwrap();
        let apps = &result.config.android_apps;
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].is_browser, Some(true));
        assert_eq!(apps[1].app_identifier, "com.slack");
        assert_eq!(apps[1].is_browser, None);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_fatal_errors() {
        assert!(matches!(
            parse("<plist><dict>"),
            Err(ImportError::MalformedXml(_))
        ));
        assert_eq!(
            parse("<?xml version=\"1.0\"?><dict><key>organization</key><string>a</string></dict>"),
            Err(ImportError::MissingPlist)
        );
        assert_eq!(
            parse("<plist version=\"1.0\"></plist>"),
            Err(ImportError::MissingRootDict)
        );
    }
}
