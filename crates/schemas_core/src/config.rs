//! Validation configuration.
//!
//! A [`Configuration`] is loaded once at process start (see the
//! `ConfigProvider` trait in `schemas_parser`) and shared read-only with the
//! engine for the whole run. Reloading means building a new value.

use crate::{GENERAL_DOMAIN, MF_DOMAIN, RuleCategory};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which rule sets are active and how strictly payloads are checked.
///
/// Domains that are not listed are treated as enabled with every category on.
///
/// # Example
///
/// ```rust
/// use schemas_core::{Configuration, RuleCategory, MF_DOMAIN};
///
/// let config = Configuration::default()
///     .with_disabled_category(MF_DOMAIN, RuleCategory::Derived);
///
/// assert!(config.is_domain_enabled(MF_DOMAIN));
/// assert!(!config.is_category_enabled(MF_DOMAIN, RuleCategory::Derived));
/// assert!(config.is_category_enabled("general", RuleCategory::Derived));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Treat payload keys that no schema field declares as failures
    pub strict: bool,

    /// Per-domain switches
    pub domains: BTreeMap<String, DomainConfig>,
}

/// Switches for one rule-set domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Whether rules originating from this domain run at all
    pub enabled: bool,

    /// Rule categories skipped for this domain
    pub disabled_categories: BTreeSet<RuleCategory>,

    /// Helper predicates skipped for this domain, by name
    pub disabled_helpers: BTreeSet<String>,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_categories: BTreeSet::new(),
            disabled_helpers: BTreeSet::new(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        let mut domains = BTreeMap::new();
        domains.insert(GENERAL_DOMAIN.to_string(), DomainConfig::default());
        domains.insert(MF_DOMAIN.to_string(), DomainConfig::default());
        Self {
            strict: false,
            domains,
        }
    }
}

impl Configuration {
    /// Creates the default configuration: non-strict, every domain enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the switches for a domain, if configured.
    pub fn domain(&self, name: &str) -> Option<&DomainConfig> {
        self.domains.get(name)
    }

    /// Whether rules originating from `domain` run at all.
    pub fn is_domain_enabled(&self, domain: &str) -> bool {
        self.domain(domain).is_none_or(|d| d.enabled)
    }

    /// Whether checks of `category` run for `domain`.
    pub fn is_category_enabled(&self, domain: &str, category: RuleCategory) -> bool {
        self.domain(domain)
            .is_none_or(|d| d.enabled && !d.disabled_categories.contains(&category))
    }

    /// Whether the named helper runs for `domain`.
    pub fn is_helper_enabled(&self, domain: &str, helper: &str) -> bool {
        self.domain(domain)
            .is_none_or(|d| d.enabled && !d.disabled_helpers.contains(helper))
    }

    /// Sets strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Disables a whole domain.
    pub fn with_domain_disabled(mut self, domain: impl Into<String>) -> Self {
        self.domains.entry(domain.into()).or_default().enabled = false;
        self
    }

    /// Disables one rule category for a domain.
    pub fn with_disabled_category(
        mut self,
        domain: impl Into<String>,
        category: RuleCategory,
    ) -> Self {
        self.domains
            .entry(domain.into())
            .or_default()
            .disabled_categories
            .insert(category);
        self
    }

    /// Disables one helper predicate for a domain.
    pub fn with_disabled_helper(
        mut self,
        domain: impl Into<String>,
        helper: impl Into<String>,
    ) -> Self {
        self.domains
            .entry(domain.into())
            .or_default()
            .disabled_helpers
            .insert(helper.into());
        self
    }
}
