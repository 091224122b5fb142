use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{CategorySet, Result, Rgbw};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub leaf: LeafConfig,
    pub display: DisplayConfig,
    pub ledger: SchemeConfig,
    pub tips: TipConfig,
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Loads `path` when given, otherwise starts from defaults; the
    /// environment is applied on top in both cases.
    pub fn from_path_or_env(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(leaf) = LeafConfig::from_lookup(&lookup) {
            self.leaf = leaf;
        }
        if let Some(user) = lookup("XRPTIPBOT_USER").filter(|user| !user.is_empty()) {
            self.tips.user = Some(user);
        }
        if let Some(time) = lookup("LEDGER_LEAF_TRANSITION_TIME").and_then(|v| v.parse().ok()) {
            self.display.transition_time = time;
        }
        self
    }
}

/// Address and credentials of the paired panel controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafConfig {
    pub ip: Option<String>,
    pub port: Option<u16>,
    pub token: Option<String>,
}

impl LeafConfig {
    /// Reads `LEAF_IP`, `LEAF_PORT` and `LEAF_TOKEN`. All three must be set.
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Option<Self> {
        let ip = lookup("LEAF_IP").filter(|ip| !ip.is_empty())?;
        let port = lookup("LEAF_PORT")?.parse().ok()?;
        let token = lookup("LEAF_TOKEN").filter(|token| !token.is_empty())?;
        Some(Self {
            ip: Some(ip),
            port: Some(port),
            token: Some(token),
        })
    }

    pub fn is_paired(&self) -> bool {
        self.ip.is_some() && self.port.is_some() && self.token.is_some()
    }

    fn api_base(&self) -> Option<String> {
        match (&self.ip, self.port, &self.token) {
            (Some(ip), Some(port), Some(token)) => Some(format!("http://{ip}:{port}/api/v1/{token}")),
            _ => None,
        }
    }

    pub fn effects_url(&self) -> Option<String> {
        self.api_base().map(|base| format!("{base}/effects"))
    }

    pub fn layout_url(&self) -> Option<String> {
        self.api_base().map(|base| format!("{base}/panelLayout/layout"))
    }
}

/// Parameters handed to the display effect encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Transition time per panel, in tenths of a second.
    pub transition_time: u16,
    pub frames: u16,
    pub duration_seconds: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            transition_time: 15,
            frames: 1,
            duration_seconds: 2,
        }
    }
}

/// Adjustments to a built-in category scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// Category that takes every panel when a batch is empty.
    pub fallback: Option<String>,
    /// Colour overrides keyed by category name.
    pub colors: BTreeMap<String, Rgbw>,
}

impl SchemeConfig {
    pub fn apply<E>(&self, mut categories: CategorySet<E>) -> Result<CategorySet<E>> {
        categories.recolor(&self.colors)?;
        match &self.fallback {
            Some(name) => categories.with_fallback(name),
            None => Ok(categories),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipConfig {
    /// User whose tips are highlighted.
    pub user: Option<String>,
    #[serde(flatten)]
    pub scheme: SchemeConfig,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{ledger, LeafError};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_need_all_leaf_variables() {
        let partial = AppConfig::default().with_overrides(lookup(&[("LEAF_IP", "10.0.0.2")]));
        assert!(!partial.leaf.is_paired());

        let full = AppConfig::default().with_overrides(lookup(&[
            ("LEAF_IP", "10.0.0.2"),
            ("LEAF_PORT", "16021"),
            ("LEAF_TOKEN", "abc"),
            ("XRPTIPBOT_USER", "alice"),
            ("LEDGER_LEAF_TRANSITION_TIME", "5"),
        ]));
        assert!(full.leaf.is_paired());
        assert_eq!(
            full.leaf.effects_url().as_deref(),
            Some("http://10.0.0.2:16021/api/v1/abc/effects")
        );
        assert_eq!(full.tips.user.as_deref(), Some("alice"));
        assert_eq!(full.display.transition_time, 5);
    }

    #[test]
    fn parses_partial_json() {
        let config: AppConfig = serde_json::from_str(
            r#"{
                "ledger": {"fallback": "others", "colors": {"failed": "128 0 0 0"}},
                "tips": {"user": "bob", "fallback": "notifications"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.ledger.fallback.as_deref(), Some("others"));
        assert_eq!(config.ledger.colors["failed"], Rgbw::new(128, 0, 0, 0));
        assert_eq!(config.tips.user.as_deref(), Some("bob"));
        assert_eq!(config.tips.scheme.fallback.as_deref(), Some("notifications"));
    }

    #[test]
    fn scheme_config_adjusts_categories() {
        let mut scheme = SchemeConfig::default();
        scheme.fallback = Some(ledger::OTHERS.to_string());
        scheme
            .colors
            .insert(ledger::FAILED.to_string(), Rgbw::new(9, 9, 9, 9));

        let set = scheme.apply(ledger::categories().unwrap()).unwrap();
        assert_eq!(set.fallback(), set.find(ledger::OTHERS));
        let failed = set.find(ledger::FAILED).and_then(|id| set.get(id)).unwrap();
        assert_eq!(failed.color(), Rgbw::new(9, 9, 9, 9));

        scheme.fallback = Some("idle".to_string());
        let err = scheme.apply(ledger::categories().unwrap()).unwrap_err();
        assert!(matches!(err, LeafError::Config(_)));
    }
}
