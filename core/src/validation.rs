//! Business rules for MDM configurations
//!
//! Errors block export, warnings never do.

use crate::registry::{AUTO_CONNECT_BOUNDS, PROXY_PORT_BOUNDS};
use crate::{FieldValue, OrganizationRecord, RootConfiguration, ServiceMode};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// A pattern rule for a string field
struct PatternRule {
    key: &'static str,
    pattern: &'static str,
    message: &'static str,
}

const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        key: "organization",
        pattern: r"^[a-zA-Z0-9_-]+$",
        message: "Organization name should contain only letters, numbers, hyphens, and underscores",
    },
    PatternRule {
        key: "gateway_unique_id",
        pattern: r"^[a-z0-9]+$",
        message: "Gateway Unique ID should contain only lowercase letters and numbers",
    },
    PatternRule {
        key: "unique_client_id",
        pattern: r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
        message: "Must be a valid UUID format (e.g., 496c6124-db89-4735-bc4e-7f759109a6f1)",
    },
    PatternRule {
        key: "support_url",
        pattern: r"^(https?://.+|mailto:.+)$",
        message: "Must be a valid URL (https://...) or mailto link (mailto:...)",
    },
    PatternRule {
        key: "override_api_endpoint",
        pattern: r"(?i)^([0-9]{1,3}\.){3}[0-9]{1,3}$|^([0-9a-f]{0,4}:){7}[0-9a-f]{0,4}$",
        message: "Must be a valid IPv4 or IPv6 address",
    },
    PatternRule {
        key: "override_doh_endpoint",
        pattern: r"(?i)^([0-9]{1,3}\.){3}[0-9]{1,3}$|^([0-9a-f]{0,4}:){7}[0-9a-f]{0,4}$",
        message: "Must be a valid IPv4 or IPv6 address",
    },
    PatternRule {
        key: "override_warp_endpoint",
        pattern: r"(?i)^([0-9]{1,3}\.){3}[0-9]{1,3}:[0-9]+$|^\[([0-9a-f]{0,4}:){7}[0-9a-f]{0,4}\]:[0-9]+$",
        message: "Must be a valid IPv4:port or [IPv6]:port address",
    },
];

static COMPILED_RULES: LazyLock<Vec<(&'static PatternRule, Regex)>> = LazyLock::new(|| {
    PATTERN_RULES
        .iter()
        .map(|rule| (rule, Regex::new(rule.pattern).unwrap()))
        .collect()
});

fn check_pattern(key: &str, value: &str) -> Option<&'static str> {
    COMPILED_RULES
        .iter()
        .find(|(rule, _)| rule.key == key)
        .filter(|(_, re)| !re.is_match(value))
        .map(|(rule, _)| rule.message)
}

/// Result of validating a whole configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validate a single field value as it is typed.
///
/// Empty and unset values always pass. Returns the message to show next to
/// the field, if any.
pub fn validate_field(key: &str, value: &FieldValue) -> Option<String> {
    match value {
        _ if value.is_empty() => None,
        FieldValue::Text(text) => check_pattern(key, text).map(String::from),
        FieldValue::Integer(n) => match key {
            "auto_connect" if !AUTO_CONNECT_BOUNDS.contains(*n) => {
                Some("auto_connect must be between 0 and 1440 minutes".to_string())
            }
            "proxy_port" if !PROXY_PORT_BOUNDS.contains(*n) => {
                Some("proxy_port must be between 0 and 65535".to_string())
            }
            _ => None,
        },
        _ => None,
    }
}

/// Validate the complete configuration
pub fn validate(config: &RootConfiguration) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let multi_org = config.is_multi_org();

    for (index, org) in config.organizations.iter().enumerate() {
        let prefix = if multi_org {
            format!("Organization #{}", index + 1)
        } else {
            "Configuration".to_string()
        };
        validate_organization(org, &prefix, multi_org, &mut errors, &mut warnings);
    }

    for (index, app) in config.android_apps.iter().enumerate() {
        if app.app_identifier.trim().is_empty() {
            errors.push(format!("Android App #{}: app_identifier is required", index + 1));
        }
    }

    if !config.organizations.iter().any(OrganizationRecord::has_identifier) {
        errors.push("At least one organization must be configured".to_string());
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn validate_organization(
    org: &OrganizationRecord,
    prefix: &str,
    multi_org: bool,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    if org.organization.trim().is_empty() {
        errors.push(format!("{}: Organization name is required", prefix));
    } else if let Some(message) = check_pattern("organization", &org.organization) {
        errors.push(format!("{}: {}", prefix, message));
    }

    let display_name_blank = org
        .display_name
        .as_deref()
        .map_or(true, |name| name.trim().is_empty());
    if multi_org && display_name_blank {
        errors.push(format!(
            "{}: Display name is required for multi-organization setups",
            prefix
        ));
    }

    match (non_empty(&org.auth_client_id), non_empty(&org.auth_client_secret)) {
        (Some(_), None) => warnings.push(format!(
            "{}: auth_client_secret should be provided when auth_client_id is set",
            prefix
        )),
        (None, Some(_)) => warnings.push(format!(
            "{}: auth_client_id should be provided when auth_client_secret is set",
            prefix
        )),
        _ => {}
    }

    match org.auto_connect {
        Some(minutes) if !AUTO_CONNECT_BOUNDS.contains(minutes) => errors.push(format!(
            "{}: auto_connect must be between 0 and 1440 minutes",
            prefix
        )),
        Some(_) => {}
        None => warnings.push(format!(
            "{}: auto_connect is recommended (use 0 for indefinite reconnection)",
            prefix
        )),
    }

    if org.switch_locked == Some(true) && org.auto_connect.is_none() {
        warnings.push(format!(
            "{}: switch_locked should be used with auto_connect parameter",
            prefix
        ));
    }

    if org.service_mode == Some(ServiceMode::Proxy) {
        match org.proxy_port {
            None => errors.push(format!(
                "{}: proxy_port is required when service_mode is \"proxy\"",
                prefix
            )),
            Some(port) if !PROXY_PORT_BOUNDS.contains(port) => errors.push(format!(
                "{}: proxy_port must be between 0 and 65535",
                prefix
            )),
            Some(_) => {}
        }
    }

    let patterned = [
        ("gateway_unique_id", &org.gateway_unique_id),
        ("support_url", &org.support_url),
        ("override_api_endpoint", &org.override_api_endpoint),
        ("override_doh_endpoint", &org.override_doh_endpoint),
        ("override_warp_endpoint", &org.override_warp_endpoint),
        ("unique_client_id", &org.unique_client_id),
    ];
    for (key, value) in patterned {
        if let Some(message) = non_empty(value).and_then(|v| check_pattern(key, v)) {
            errors.push(format!("{}: {}", prefix, message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AndroidAppRecord;

    fn valid_org(name: &str) -> OrganizationRecord {
        OrganizationRecord {
            auto_connect: Some(0),
            ..OrganizationRecord::new(name)
        }
    }

    #[test]
    fn test_valid_single_org() {
        let result = validate(&RootConfiguration::with_organization(valid_org("acme")));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_configuration_is_invalid() {
        let result = validate(&RootConfiguration::default());
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Configuration: Organization name is required".to_string(),
                "At least one organization must be configured".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_configuration() {
        let result = validate(&RootConfiguration::empty());
        assert_eq!(
            result.errors,
            vec!["At least one organization must be configured".to_string()]
        );
    }

    #[test]
    fn test_organization_pattern() {
        let result = validate(&RootConfiguration::with_organization(valid_org("acme corp")));
        assert_eq!(
            result.errors,
            vec!["Configuration: Organization name should contain only letters, numbers, hyphens, and underscores".to_string()]
        );
    }

    #[test]
    fn test_multi_org_requires_display_names() {
        let config = RootConfiguration::with_organization(valid_org("acme"))
            .with_organization_added(valid_org("beta").with_display_name("Beta"));
        let result = validate(&config);
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Organization #1: Display name is required for multi-organization setups".to_string()]
        );
    }

    #[test]
    fn test_auth_pair_warnings() {
        let org = OrganizationRecord {
            auth_client_id: Some("id.access".into()),
            ..valid_org("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org));
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec!["Configuration: auth_client_secret should be provided when auth_client_id is set".to_string()]
        );

        let org = OrganizationRecord {
            auth_client_secret: Some("secret".into()),
            ..valid_org("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("auth_client_id should be provided"));
    }

    #[test]
    fn test_auto_connect_rules() {
        let org = OrganizationRecord {
            auto_connect: Some(9999),
            ..OrganizationRecord::new("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org));
        assert_eq!(
            result.errors,
            vec!["Configuration: auto_connect must be between 0 and 1440 minutes".to_string()]
        );

        let org = OrganizationRecord {
            switch_locked: Some(true),
            ..OrganizationRecord::new("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org));
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("auto_connect is recommended"));
        assert!(result.warnings[1].contains("switch_locked should be used"));
    }

    #[test]
    fn test_proxy_mode_requires_port() {
        let org = OrganizationRecord {
            service_mode: Some(ServiceMode::Proxy),
            ..valid_org("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org.clone()));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Configuration: proxy_port is required when service_mode is \"proxy\"".to_string()]
        );

        let out_of_range = OrganizationRecord {
            proxy_port: Some(70000),
            ..org.clone()
        };
        let result = validate(&RootConfiguration::with_organization(out_of_range));
        assert!(result.errors[0].contains("between 0 and 65535"));

        let ok = OrganizationRecord {
            proxy_port: Some(1080),
            ..org
        };
        assert!(validate(&RootConfiguration::with_organization(ok)).valid);
    }

    #[test]
    fn test_proxy_port_ignored_outside_proxy_mode() {
        let org = OrganizationRecord {
            service_mode: Some(ServiceMode::FullTunnel),
            proxy_port: Some(-5),
            ..valid_org("acme")
        };
        assert!(validate(&RootConfiguration::with_organization(org)).valid);
    }

    #[test]
    fn test_pattern_fields() {
        let org = OrganizationRecord {
            gateway_unique_id: Some("ABC-123".into()),
            support_url: Some("ftp://example.com".into()),
            override_api_endpoint: Some("not-an-ip".into()),
            override_doh_endpoint: Some("2001:db8:0:0:0:0:0:1".into()),
            override_warp_endpoint: Some("203.0.113.0".into()),
            unique_client_id: Some("1234".into()),
            ..valid_org("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org));
        assert_eq!(result.errors.len(), 5);
        assert!(result.errors[0].contains("Gateway Unique ID"));
        assert!(result.errors[1].contains("mailto"));
        assert!(result.errors[2].contains("IPv4 or IPv6"));
        assert!(result.errors[3].contains("IPv4:port"));
        assert!(result.errors[4].contains("UUID"));
    }

    #[test]
    fn test_valid_pattern_fields() {
        let org = OrganizationRecord {
            gateway_unique_id: Some("abc123".into()),
            support_url: Some("mailto:it@example.com".into()),
            override_api_endpoint: Some("1.2.3.4".into()),
            override_warp_endpoint: Some("[2001:db8:0:0:0:0:0:1]:500".into()),
            unique_client_id: Some("496C6124-DB89-4735-BC4E-7F759109A6F1".into()),
            ..valid_org("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org));
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn test_endpoints_require_ascii_digits() {
        let org = OrganizationRecord {
            override_api_endpoint: Some("١.٢.٣.٤".into()),
            override_doh_endpoint: Some("١.٢.٣.٤".into()),
            override_warp_endpoint: Some("١.٢.٣.٤:٥٠٠".into()),
            ..valid_org("acme")
        };
        let result = validate(&RootConfiguration::with_organization(org));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Configuration: Must be a valid IPv4 or IPv6 address".to_string(),
                "Configuration: Must be a valid IPv4 or IPv6 address".to_string(),
                "Configuration: Must be a valid IPv4:port or [IPv6]:port address".to_string(),
            ]
        );
        assert!(validate_field(
            "override_api_endpoint",
            &FieldValue::Text("١.٢.٣.٤".into())
        )
        .is_some());
    }

    #[test]
    fn test_android_apps_require_identifier() {
        let mut config = RootConfiguration::with_organization(valid_org("acme"));
        config.android_apps = vec![AndroidAppRecord::new("com.slack"), AndroidAppRecord::new("  ")];
        let result = validate(&config);
        assert_eq!(
            result.errors,
            vec!["Android App #2: app_identifier is required".to_string()]
        );
    }

    #[test]
    fn test_validate_field() {
        assert!(validate_field("organization", &FieldValue::Text("acme".into())).is_none());
        assert!(validate_field("organization", &FieldValue::Text("a b".into())).is_some());
        assert!(validate_field("organization", &FieldValue::Text(String::new())).is_none());
        assert!(validate_field("auto_connect", &FieldValue::Integer(1441)).is_some());
        assert!(validate_field("auto_connect", &FieldValue::Integer(1440)).is_none());
        assert!(validate_field("proxy_port", &FieldValue::Integer(65536)).is_some());
        assert!(validate_field("display_name", &FieldValue::Text("<anything>".into())).is_none());
        assert!(validate_field("support_url", &FieldValue::Unset).is_none());
    }
}
