//! Live editing session over a configuration snapshot
//!
//! Every edit builds a new `RootConfiguration` and swaps it in. Readers that
//! took a snapshot keep seeing the configuration they took.

use crate::parser::{self, ImportResult};
use crate::serializer;
use crate::validation::{self, ValidationResult};
use crate::{
    registry, AndroidAppRecord, Error, FieldValue, ImportError, OrganizationRecord, Result,
    RootConfiguration, Settings,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Session {
    current: Arc<RootConfiguration>,
    template: OrganizationRecord,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session holding one default organization
    pub fn new() -> Self {
        Self::from_template(OrganizationRecord::fresh())
    }

    /// A session whose new organizations carry the configured defaults
    pub fn with_defaults(settings: &Settings) -> Self {
        Self::from_template(settings.fresh_organization())
    }

    fn from_template(template: OrganizationRecord) -> Self {
        Self {
            current: Arc::new(RootConfiguration::with_organization(template.clone())),
            template,
        }
    }

    /// Shared view of the current configuration
    pub fn snapshot(&self) -> Arc<RootConfiguration> {
        Arc::clone(&self.current)
    }

    pub fn config(&self) -> &RootConfiguration {
        &self.current
    }

    fn commit(&mut self, next: RootConfiguration) {
        self.current = Arc::new(next);
    }

    /// Append a default organization and return its index
    pub fn add_organization(&mut self) -> usize {
        let next = self.current.with_organization_added(self.template.clone());
        let index = next.organizations.len() - 1;
        self.commit(next);
        log::debug!("Added organization #{}", index + 1);
        index
    }

    pub fn remove_organization(&mut self, index: usize) -> Result<()> {
        let mut next = self.current.with_organization_removed(index)?;
        // The model substitutes a bare fresh record; use this session's defaults instead.
        if self.current.organizations.len() == 1 {
            next.organizations[0] = self.template.clone();
        }
        self.commit(next);
        log::debug!("Removed organization #{}", index + 1);
        Ok(())
    }

    pub fn update_organization(&mut self, index: usize, record: OrganizationRecord) -> Result<()> {
        let next = self.current.with_organization_replaced(index, record)?;
        self.commit(next);
        Ok(())
    }

    /// Apply a global edit and return the field message, if any
    pub fn set_global(&mut self, key: &str, value: FieldValue) -> Result<Option<String>> {
        let message = validation::validate_field(key, &value);
        let next = self.current.with_global(key, value)?;
        self.commit(next);
        log::debug!("Set global '{}'", key);
        Ok(message)
    }

    /// Apply an organization field edit and return the field message, if any
    pub fn set_field(
        &mut self,
        index: usize,
        key: &str,
        value: FieldValue,
    ) -> Result<Option<String>> {
        if !registry::is_organization_key(key) {
            return Err(Error::field(format!("Unknown parameter '{}'", key)));
        }
        let record = self
            .current
            .organizations
            .get(index)
            .ok_or_else(|| Error::not_found(format!("Organization #{}", index + 1)))?;
        let message = validation::validate_field(key, &value);
        let updated = record.with_field(key, value)?;
        let next = self.current.with_organization_replaced(index, updated)?;
        self.commit(next);
        log::debug!("Set '{}' on organization #{}", key, index + 1);
        Ok(message)
    }

    /// Give an organization a new random unique_client_id and return it
    pub fn generate_client_id(&mut self, index: usize) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.set_field(index, "unique_client_id", FieldValue::Text(id.clone()))?;
        Ok(id)
    }

    /// Append an empty Android app entry and return its index
    pub fn add_android_app(&mut self) -> usize {
        let next = self.current.with_android_app_added(AndroidAppRecord::fresh());
        let index = next.android_apps.len() - 1;
        self.commit(next);
        index
    }

    pub fn update_android_app(&mut self, index: usize, app: AndroidAppRecord) -> Result<()> {
        let next = self.current.with_android_app_replaced(index, app)?;
        self.commit(next);
        Ok(())
    }

    pub fn remove_android_app(&mut self, index: usize) -> Result<()> {
        let next = self.current.with_android_app_removed(index)?;
        self.commit(next);
        Ok(())
    }

    /// Replace the configuration with the parsed document.
    ///
    /// On failure the current configuration is kept as it was.
    pub fn import(&mut self, xml: &str) -> std::result::Result<Vec<String>, ImportError> {
        let ImportResult { mut config, warnings } = parser::parse(xml)?;
        if config.organizations.is_empty() {
            config.organizations.push(self.template.clone());
        }
        log::info!(
            "Imported {} organization(s) with {} warning(s)",
            config.organizations.len(),
            warnings.len()
        );
        self.commit(config);
        Ok(warnings)
    }

    pub fn export(&self) -> String {
        serializer::serialize(&self.current)
    }

    pub fn validation(&self) -> ValidationResult {
        validation::validate(&self.current)
    }
}
