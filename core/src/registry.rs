//! Static catalogue of every recognized MDM parameter

use serde::Serialize;

/// Kind of value a parameter holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
    Enum,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
            ValueKind::Enum => "enum",
        }
    }
}

/// UI grouping tag. Has no effect on serialization or validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Essential,
    Authentication,
    Behavior,
    Network,
    Identity,
    Global,
    Android,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnumOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub min: i64,
    pub max: i64,
}

impl Bounds {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub kind: ValueKind,
    pub enum_options: &'static [EnumOption],
    pub bounds: Option<Bounds>,
    pub required: bool,
    pub placeholder: Option<&'static str>,
    pub platforms: &'static [&'static str],
    pub category: Category,
}

impl ParameterDescriptor {
    const fn base(
        key: &'static str,
        label: &'static str,
        description: &'static str,
        kind: ValueKind,
        category: Category,
    ) -> Self {
        Self {
            key,
            label,
            description,
            kind,
            enum_options: &[],
            bounds: None,
            required: false,
            placeholder: None,
            platforms: &[],
            category,
        }
    }
}

pub const AUTO_CONNECT_BOUNDS: Bounds = Bounds { min: 0, max: 1440 };
pub const PROXY_PORT_BOUNDS: Bounds = Bounds { min: 0, max: 65535 };

const SERVICE_MODE_OPTIONS: &[EnumOption] = &[
    EnumOption { value: "warp", label: "Gateway with WARP (recommended)" },
    EnumOption { value: "1dot1", label: "Gateway with DoH (DNS only)" },
    EnumOption { value: "proxy", label: "Proxy mode (requires proxy_port)" },
    EnumOption { value: "postureonly", label: "Device Information Only" },
];

const WINDOWS_ONLY: &[&str] = &["Windows"];
const MOBILE_ONLY: &[&str] = &["iOS", "Android", "ChromeOS"];
const ALL_PLATFORMS: &[&str] = &["Windows", "macOS", "Linux", "iOS", "Android", "ChromeOS"];

/// Parameters set per organization (or at the root in single-org files)
pub const ORGANIZATION_PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor {
        required: true,
        placeholder: Some("mycompany"),
        ..ParameterDescriptor::base(
            "organization",
            "Organization",
            "Your Cloudflare Zero Trust team name.",
            ValueKind::String,
            Category::Essential,
        )
    },
    ParameterDescriptor {
        bounds: Some(AUTO_CONNECT_BOUNDS),
        placeholder: Some("0"),
        ..ParameterDescriptor::base(
            "auto_connect",
            "Auto Connect",
            "Minutes before automatically reconnecting if the user turns off WARP. 0 reconnects indefinitely.",
            ValueKind::Integer,
            Category::Essential,
        )
    },
    ParameterDescriptor {
        enum_options: SERVICE_MODE_OPTIONS,
        ..ParameterDescriptor::base(
            "service_mode",
            "Service Mode",
            "Operational mode of the WARP client.",
            ValueKind::Enum,
            Category::Essential,
        )
    },
    ParameterDescriptor {
        placeholder: Some("Production Environment"),
        ..ParameterDescriptor::base(
            "display_name",
            "Display Name",
            "Name shown in the WARP GUI for this organization. Required for multi-org deployments.",
            ValueKind::String,
            Category::Essential,
        )
    },
    ParameterDescriptor {
        placeholder: Some("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx.access"),
        ..ParameterDescriptor::base(
            "auth_client_id",
            "Auth Client ID",
            "Client ID from a service token for enrollment without user interaction.",
            ValueKind::String,
            Category::Authentication,
        )
    },
    ParameterDescriptor::base(
        "auth_client_secret",
        "Auth Client Secret",
        "Client secret from the service token (required with auth_client_id).",
        ValueKind::String,
        Category::Authentication,
    ),
    ParameterDescriptor {
        placeholder: Some("xxxxxxxxxxxxxx"),
        ..ParameterDescriptor::base(
            "gateway_unique_id",
            "Gateway Unique ID",
            "DoH subdomain directing DNS queries to a specific Gateway location.",
            ValueKind::String,
            Category::Authentication,
        )
    },
    ParameterDescriptor::base(
        "switch_locked",
        "Switch Locked",
        "Prevents users from turning off WARP and starts the client connected.",
        ValueKind::Boolean,
        Category::Behavior,
    ),
    ParameterDescriptor::base(
        "onboarding",
        "Show Onboarding",
        "When disabled, skips onboarding screens and the privacy policy on first launch.",
        ValueKind::Boolean,
        Category::Behavior,
    ),
    ParameterDescriptor {
        placeholder: Some("https://support.example.com or mailto:it@example.com"),
        ..ParameterDescriptor::base(
            "support_url",
            "Support URL",
            "URL or mailto link behind the \"Send Feedback\" button.",
            ValueKind::String,
            Category::Behavior,
        )
    },
    ParameterDescriptor {
        placeholder: Some("1.2.3.4"),
        ..ParameterDescriptor::base(
            "override_api_endpoint",
            "Override API Endpoint",
            "IPv4 or IPv6 address to redirect client API calls.",
            ValueKind::String,
            Category::Network,
        )
    },
    ParameterDescriptor {
        placeholder: Some("1.2.3.4"),
        ..ParameterDescriptor::base(
            "override_doh_endpoint",
            "Override DoH Endpoint",
            "IPv4 or IPv6 address to redirect DNS over HTTPS lookups.",
            ValueKind::String,
            Category::Network,
        )
    },
    ParameterDescriptor {
        placeholder: Some("203.0.113.0:500"),
        ..ParameterDescriptor::base(
            "override_warp_endpoint",
            "Override WARP Endpoint",
            "Socket address (IPv4:port or [IPv6]:port) to redirect tunnel traffic.",
            ValueKind::String,
            Category::Network,
        )
    },
    ParameterDescriptor {
        platforms: ALL_PLATFORMS,
        ..ParameterDescriptor::base(
            "enable_post_quantum",
            "Enable Post-Quantum Cryptography",
            "Use post-quantum cryptography to secure connections.",
            ValueKind::Boolean,
            Category::Network,
        )
    },
    ParameterDescriptor {
        bounds: Some(PROXY_PORT_BOUNDS),
        placeholder: Some("1080"),
        ..ParameterDescriptor::base(
            "proxy_port",
            "Proxy Port",
            "SOCKS proxy port. Required when service_mode is \"proxy\".",
            ValueKind::Integer,
            Category::Network,
        )
    },
    ParameterDescriptor {
        placeholder: Some("496c6124-db89-4735-bc4e-7f759109a6f1"),
        platforms: MOBILE_ONLY,
        ..ParameterDescriptor::base(
            "unique_client_id",
            "Unique Client ID",
            "Device UUID for device posture checks.",
            ValueKind::String,
            Category::Identity,
        )
    },
];

/// Root-level flags that apply to every organization
pub const GLOBAL_PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor {
        platforms: WINDOWS_ONLY,
        ..ParameterDescriptor::base(
            "multi_user",
            "Multi-User Support",
            "Enable multiple user registrations on Windows devices.",
            ValueKind::Boolean,
            Category::Global,
        )
    },
    ParameterDescriptor {
        platforms: WINDOWS_ONLY,
        ..ParameterDescriptor::base(
            "pre_login",
            "Pre-Login Support",
            "Allow WARP to connect with a service token before Windows login.",
            ValueKind::Boolean,
            Category::Global,
        )
    },
];

/// Fields of one `android_apps` entry
pub const ANDROID_APP_PARAMETERS: &[ParameterDescriptor] = &[
    ParameterDescriptor {
        required: true,
        placeholder: Some("com.android.chrome"),
        ..ParameterDescriptor::base(
            "app_identifier",
            "App Identifier",
            "Package name from the Google Play Store URL.",
            ValueKind::String,
            Category::Android,
        )
    },
    ParameterDescriptor::base(
        "is_browser",
        "Is Browser",
        "Marks the app as a browser for re-authentication and block notifications.",
        ValueKind::Boolean,
        Category::Android,
    ),
];

/// Look up the descriptor for a key in any catalogue
pub fn describe(key: &str) -> Option<&'static ParameterDescriptor> {
    ORGANIZATION_PARAMETERS
        .iter()
        .chain(GLOBAL_PARAMETERS)
        .chain(ANDROID_APP_PARAMETERS)
        .find(|d| d.key == key)
}

pub fn is_organization_key(key: &str) -> bool {
    ORGANIZATION_PARAMETERS.iter().any(|d| d.key == key)
}

pub fn is_global_key(key: &str) -> bool {
    GLOBAL_PARAMETERS.iter().any(|d| d.key == key)
}

pub fn is_android_app_key(key: &str) -> bool {
    ANDROID_APP_PARAMETERS.iter().any(|d| d.key == key)
}

pub fn organization_keys() -> impl Iterator<Item = &'static str> {
    ORGANIZATION_PARAMETERS.iter().map(|d| d.key)
}

pub fn global_keys() -> impl Iterator<Item = &'static str> {
    GLOBAL_PARAMETERS.iter().map(|d| d.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ANDROID_APP_FIELDS, GLOBAL_FIELDS, ORGANIZATION_FIELDS};
    use crate::ServiceMode;
    use std::collections::HashSet;

    #[test]
    fn test_keys_unique() {
        let all: Vec<_> = ORGANIZATION_PARAMETERS
            .iter()
            .chain(GLOBAL_PARAMETERS)
            .chain(ANDROID_APP_PARAMETERS)
            .map(|d| d.key)
            .collect();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
    }

    #[test]
    fn test_registry_is_exhaustive() {
        let org: HashSet<&str> = organization_keys().collect();
        let expected: HashSet<&str> = ORGANIZATION_FIELDS.into_iter().collect();
        assert_eq!(org, expected);

        let global: HashSet<&str> = global_keys().collect();
        let expected: HashSet<&str> = GLOBAL_FIELDS.into_iter().collect();
        assert_eq!(global, expected);

        for key in ANDROID_APP_FIELDS {
            assert!(is_android_app_key(key));
        }
    }

    #[test]
    fn test_describe() {
        let d = describe("auto_connect").unwrap();
        assert_eq!(d.kind, ValueKind::Integer);
        assert_eq!(d.bounds, Some(AUTO_CONNECT_BOUNDS));
        assert!(!d.required);

        assert!(describe("organization").unwrap().required);
        assert_eq!(describe("pre_login").unwrap().category, Category::Global);
        assert!(describe("configs").is_none());
        assert!(describe("foo_bar").is_none());
    }

    #[test]
    fn test_service_mode_options_match_enum() {
        let d = describe("service_mode").unwrap();
        let values: Vec<_> = d.enum_options.iter().map(|o| o.value).collect();
        let modes: Vec<_> = ServiceMode::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(values, modes);
    }

    #[test]
    fn test_bounds() {
        assert!(PROXY_PORT_BOUNDS.contains(0));
        assert!(PROXY_PORT_BOUNDS.contains(65535));
        assert!(!PROXY_PORT_BOUNDS.contains(65536));
        assert!(!AUTO_CONNECT_BOUNDS.contains(-1));
    }
}
