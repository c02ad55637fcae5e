//! Domain model types for WARP MDM configurations

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Organization-level keys in the order they are written to a plist dict
pub const ORGANIZATION_FIELDS: [&str; 16] = [
    "organization",
    "display_name",
    "auth_client_id",
    "auth_client_secret",
    "gateway_unique_id",
    "auto_connect",
    "onboarding",
    "switch_locked",
    "support_url",
    "service_mode",
    "proxy_port",
    "override_api_endpoint",
    "override_doh_endpoint",
    "override_warp_endpoint",
    "enable_post_quantum",
    "unique_client_id",
];

/// Global (root-level) flag keys
pub const GLOBAL_FIELDS: [&str; 2] = ["multi_user", "pre_login"];

/// Keys of a single Android app dict
pub const ANDROID_APP_FIELDS: [&str; 2] = ["app_identifier", "is_browser"];

/// Operational mode of the WARP client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceMode {
    #[serde(rename = "warp")]
    FullTunnel,
    #[serde(rename = "1dot1")]
    DnsOnly,
    #[serde(rename = "proxy")]
    Proxy,
    #[serde(rename = "postureonly")]
    PostureOnly,
}

impl ServiceMode {
    pub const ALL: [ServiceMode; 4] = [
        ServiceMode::FullTunnel,
        ServiceMode::DnsOnly,
        ServiceMode::Proxy,
        ServiceMode::PostureOnly,
    ];

    /// Literal token used in the plist
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::FullTunnel => "warp",
            ServiceMode::DnsOnly => "1dot1",
            ServiceMode::Proxy => "proxy",
            ServiceMode::PostureOnly => "postureonly",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceMode::FullTunnel => "Gateway with WARP (recommended)",
            ServiceMode::DnsOnly => "Gateway with DoH (DNS only)",
            ServiceMode::Proxy => "Proxy mode (requires proxy_port)",
            ServiceMode::PostureOnly => "Device Information Only",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceMode::FullTunnel => {
                "Full Gateway with WARP tunnel - routes all traffic through Cloudflare Gateway"
            }
            ServiceMode::DnsOnly => "Gateway with DoH - enforces DNS policies only using DNS over HTTPS",
            ServiceMode::Proxy => "Proxy mode - uses SOCKS5 proxy for traffic routing",
            ServiceMode::PostureOnly => {
                "Device Information Only - collects device posture without routing traffic"
            }
        }
    }

    /// Look up a mode by its plist token. Matching is exact.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == token)
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field value as supplied by an editor or read back from a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    /// Clears the field back to "use the client default"
    Unset,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Unset => true,
            FieldValue::Integer(_) | FieldValue::Bool(_) => false,
        }
    }

    fn into_text(self, key: &str) -> Result<Option<String>> {
        match self {
            FieldValue::Text(s) if s.is_empty() => Ok(None),
            FieldValue::Text(s) => Ok(Some(s)),
            FieldValue::Unset => Ok(None),
            other => Err(type_mismatch(key, "text", &other)),
        }
    }

    fn into_integer(self, key: &str) -> Result<Option<i64>> {
        match self {
            FieldValue::Integer(n) => Ok(Some(n)),
            FieldValue::Unset => Ok(None),
            other => Err(type_mismatch(key, "an integer", &other)),
        }
    }

    fn into_bool(self, key: &str) -> Result<Option<bool>> {
        match self {
            FieldValue::Bool(b) => Ok(Some(b)),
            FieldValue::Unset => Ok(None),
            other => Err(type_mismatch(key, "a boolean", &other)),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Unset => f.write_str("(unset)"),
        }
    }
}

fn type_mismatch(key: &str, expected: &str, got: &FieldValue) -> Error {
    Error::field(format!("'{}' expects {}, got '{}'", key, expected, got))
}

/// Per-tenant parameter set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationRecord {
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_unique_id: Option<String>,
    /// Minutes before reconnecting; 0 means indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_connect: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_mode: Option<ServiceMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_api_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_doh_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_warp_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_post_quantum: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_client_id: Option<String>,
}

impl OrganizationRecord {
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            ..Self::default()
        }
    }

    /// The record a new editing session starts with
    pub fn fresh() -> Self {
        Self {
            auto_connect: Some(0),
            service_mode: Some(ServiceMode::FullTunnel),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn has_identifier(&self) -> bool {
        !self.organization.trim().is_empty()
    }

    /// Read a field by its plist key. Absent values and unknown keys yield `None`.
    pub fn field_value(&self, key: &str) -> Option<FieldValue> {
        let text = |v: &Option<String>| v.clone().map(FieldValue::Text);
        let int = |v: Option<i64>| v.map(FieldValue::Integer);
        let flag = |v: Option<bool>| v.map(FieldValue::Bool);

        match key {
            "organization" => Some(FieldValue::Text(self.organization.clone())),
            "display_name" => text(&self.display_name),
            "auth_client_id" => text(&self.auth_client_id),
            "auth_client_secret" => text(&self.auth_client_secret),
            "gateway_unique_id" => text(&self.gateway_unique_id),
            "auto_connect" => int(self.auto_connect),
            "onboarding" => flag(self.onboarding),
            "switch_locked" => flag(self.switch_locked),
            "support_url" => text(&self.support_url),
            "service_mode" => self
                .service_mode
                .map(|mode| FieldValue::Text(mode.as_str().to_string())),
            "proxy_port" => int(self.proxy_port),
            "override_api_endpoint" => text(&self.override_api_endpoint),
            "override_doh_endpoint" => text(&self.override_doh_endpoint),
            "override_warp_endpoint" => text(&self.override_warp_endpoint),
            "enable_post_quantum" => flag(self.enable_post_quantum),
            "unique_client_id" => text(&self.unique_client_id),
            _ => None,
        }
    }

    /// Return a copy of this record with one field replaced
    pub fn with_field(&self, key: &str, value: FieldValue) -> Result<Self> {
        let mut next = self.clone();
        match key {
            "organization" => next.organization = value.into_text(key)?.unwrap_or_default(),
            "display_name" => next.display_name = value.into_text(key)?,
            "auth_client_id" => next.auth_client_id = value.into_text(key)?,
            "auth_client_secret" => next.auth_client_secret = value.into_text(key)?,
            "gateway_unique_id" => next.gateway_unique_id = value.into_text(key)?,
            "auto_connect" => next.auto_connect = value.into_integer(key)?,
            "onboarding" => next.onboarding = value.into_bool(key)?,
            "switch_locked" => next.switch_locked = value.into_bool(key)?,
            "support_url" => next.support_url = value.into_text(key)?,
            "service_mode" => {
                next.service_mode = match value.into_text(key)? {
                    None => None,
                    Some(token) => Some(ServiceMode::from_token(&token).ok_or_else(|| {
                        Error::field(format!("Invalid value for 'service_mode': {}", token))
                    })?),
                }
            }
            "proxy_port" => next.proxy_port = value.into_integer(key)?,
            "override_api_endpoint" => next.override_api_endpoint = value.into_text(key)?,
            "override_doh_endpoint" => next.override_doh_endpoint = value.into_text(key)?,
            "override_warp_endpoint" => next.override_warp_endpoint = value.into_text(key)?,
            "enable_post_quantum" => next.enable_post_quantum = value.into_bool(key)?,
            "unique_client_id" => next.unique_client_id = value.into_text(key)?,
            _ => {
                return Err(Error::field(format!(
                    "Unknown organization parameter '{}'",
                    key
                )))
            }
        }
        Ok(next)
    }
}

/// Android per-app VPN entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidAppRecord {
    /// Package name from the Play Store URL
    pub app_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_browser: Option<bool>,
}

impl AndroidAppRecord {
    pub fn new(app_identifier: impl Into<String>) -> Self {
        Self {
            app_identifier: app_identifier.into(),
            is_browser: None,
        }
    }

    /// The entry an editor appends when adding an app
    pub fn fresh() -> Self {
        Self {
            app_identifier: String::new(),
            is_browser: Some(false),
        }
    }
}

/// Complete MDM configuration
///
/// Values are treated as immutable snapshots: the `with_*` methods return a
/// new configuration and leave `self` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_login: Option<bool>,
    pub organizations: Vec<OrganizationRecord>,
    pub android_apps: Vec<AndroidAppRecord>,
}

impl Default for RootConfiguration {
    fn default() -> Self {
        Self::with_organization(OrganizationRecord::fresh())
    }
}

impl RootConfiguration {
    /// A configuration holding nothing at all, not even an organization
    pub fn empty() -> Self {
        Self {
            multi_user: None,
            pre_login: None,
            organizations: Vec::new(),
            android_apps: Vec::new(),
        }
    }

    pub fn with_organization(record: OrganizationRecord) -> Self {
        Self {
            organizations: vec![record],
            ..Self::empty()
        }
    }

    pub fn is_multi_org(&self) -> bool {
        self.organizations.len() > 1
    }

    pub fn global_value(&self, key: &str) -> Option<FieldValue> {
        match key {
            "multi_user" => self.multi_user.map(FieldValue::Bool),
            "pre_login" => self.pre_login.map(FieldValue::Bool),
            _ => None,
        }
    }

    pub fn with_global(&self, key: &str, value: FieldValue) -> Result<Self> {
        let mut next = self.clone();
        match key {
            "multi_user" => next.multi_user = value.into_bool(key)?,
            "pre_login" => next.pre_login = value.into_bool(key)?,
            _ => return Err(Error::field(format!("Unknown global parameter '{}'", key))),
        }
        Ok(next)
    }

    pub fn with_organization_added(&self, record: OrganizationRecord) -> Self {
        let mut next = self.clone();
        next.organizations.push(record);
        next
    }

    /// Remove an organization. Removing the last one leaves a fresh record in
    /// its place so the editing model is never without an organization.
    pub fn with_organization_removed(&self, index: usize) -> Result<Self> {
        self.check_org_index(index)?;
        let mut next = self.clone();
        next.organizations.remove(index);
        if next.organizations.is_empty() {
            next.organizations.push(OrganizationRecord::fresh());
        }
        Ok(next)
    }

    pub fn with_organization_replaced(&self, index: usize, record: OrganizationRecord) -> Result<Self> {
        self.check_org_index(index)?;
        let mut next = self.clone();
        next.organizations[index] = record;
        Ok(next)
    }

    pub fn with_android_app_added(&self, app: AndroidAppRecord) -> Self {
        let mut next = self.clone();
        next.android_apps.push(app);
        next
    }

    pub fn with_android_app_removed(&self, index: usize) -> Result<Self> {
        self.check_app_index(index)?;
        let mut next = self.clone();
        next.android_apps.remove(index);
        Ok(next)
    }

    pub fn with_android_app_replaced(&self, index: usize, app: AndroidAppRecord) -> Result<Self> {
        self.check_app_index(index)?;
        let mut next = self.clone();
        next.android_apps[index] = app;
        Ok(next)
    }

    fn check_org_index(&self, index: usize) -> Result<()> {
        if index >= self.organizations.len() {
            return Err(Error::not_found(format!(
                "Organization #{} does not exist ({} configured)",
                index + 1,
                self.organizations.len()
            )));
        }
        Ok(())
    }

    fn check_app_index(&self, index: usize) -> Result<()> {
        if index >= self.android_apps.len() {
            return Err(Error::not_found(format!(
                "Android app #{} does not exist ({} configured)",
                index + 1,
                self.android_apps.len()
            )));
        }
        Ok(())
    }
}
