//! Registry of the processes a page tracks.
//!
//! The registry is built once from a [`PageConfig`] and never changes
//! afterwards. Iteration follows registration order: the implicit process of
//! a single-process page first, then the explicit `[[process]]` entries.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::{PageConfig, LEGACY_PROCESS_ID};
use pw_protocol::UiRefs;
use reqwest::Url;
use std::collections::HashSet;
use std::time::Duration;

/// One tracked process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDescriptor {
    /// Unique id within the registry.
    pub id: String,

    /// Endpoint answering status requests.
    pub status_url: Url,

    /// Elements this process owns on the surface.
    pub ui: UiRefs,

    /// Log file name for file-mode tailing.
    pub log_file: Option<String>,

    /// Interval override for this process.
    pub poll_interval: Option<Duration>,
}

/// Immutable, ordered set of tracked processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    descriptors: Vec<ProcessDescriptor>,
}

impl ProcessRegistry {
    /// Build the registry from a page configuration.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if a status URL does not parse
    /// - `DuplicateProcess` if two processes share an id
    pub fn from_config(config: &PageConfig) -> ConfigResult<Self> {
        let mut descriptors = Vec::with_capacity(config.processes.len() + 1);

        if let Some(status_url) = config.status_url.as_deref().filter(|u| !u.trim().is_empty()) {
            descriptors.push(ProcessDescriptor {
                id: LEGACY_PROCESS_ID.to_string(),
                status_url: parse_url(status_url)?,
                ui: UiRefs::legacy(),
                log_file: config.log_file.clone(),
                poll_interval: None,
            });
        }

        for process in &config.processes {
            descriptors.push(ProcessDescriptor {
                id: process.id.clone(),
                status_url: parse_url(&process.status_url)?,
                ui: process.ui.apply(UiRefs::for_process(&process.id)),
                log_file: process.log_file.clone(),
                poll_interval: process.poll_interval_ms.map(Duration::from_millis),
            });
        }

        Self::new(descriptors)
    }

    /// Build a registry from descriptors, rejecting duplicate ids.
    pub fn new(descriptors: Vec<ProcessDescriptor>) -> ConfigResult<Self> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.id.as_str()) {
                return Err(ConfigError::DuplicateProcess {
                    id: descriptor.id.clone(),
                });
            }
        }
        Ok(Self { descriptors })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessDescriptor> {
        self.descriptors.iter()
    }

    /// Call `f` on every descriptor in registration order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&ProcessDescriptor),
    {
        self.descriptors.iter().for_each(f);
    }

    pub fn get(&self, id: &str) -> Option<&ProcessDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// The longest of `page_interval` and every per-process override.
    pub fn longest_interval(&self, page_interval: Duration) -> Duration {
        self.descriptors
            .iter()
            .filter_map(|d| d.poll_interval)
            .fold(page_interval, Duration::max)
    }
}

fn parse_url(value: &str) -> ConfigResult<Url> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::ProcessConfig;

    fn process(id: &str) -> ProcessConfig {
        ProcessConfig {
            id: id.to_string(),
            status_url: format!("http://localhost:8000/{id}/status"),
            log_file: None,
            poll_interval_ms: None,
            ui: Default::default(),
        }
    }

    #[test]
    fn test_single_process_page_uses_legacy_ids() {
        let config = PageConfig {
            status_url: Some("http://localhost:8000/status".to_string()),
            log_file: Some("None".to_string()),
            ..Default::default()
        };

        let registry = ProcessRegistry::from_config(&config).expect("Failed to build registry");

        assert_eq!(registry.len(), 1);
        let descriptor = registry.get(LEGACY_PROCESS_ID).expect("legacy process missing");
        assert_eq!(descriptor.ui, UiRefs::legacy());
        assert_eq!(descriptor.status_url.path(), "/status");
        assert_eq!(descriptor.log_file.as_deref(), Some("None"));
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let config = PageConfig {
            status_url: Some("http://localhost:8000/status".to_string()),
            processes: vec![process("b"), process("a"), process("c")],
            ..Default::default()
        };

        let registry = ProcessRegistry::from_config(&config).expect("Failed to build registry");

        let mut ids = Vec::new();
        registry.for_each(|d| ids.push(d.id.clone()));
        assert_eq!(ids, vec![LEGACY_PROCESS_ID, "b", "a", "c"]);
        assert_eq!(registry.get("a").map(|d| &d.ui), Some(&UiRefs::for_process("a")));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let config = PageConfig {
            processes: vec![process("fa"), process("fa")],
            ..Default::default()
        };

        let result = ProcessRegistry::from_config(&config);
        assert!(matches!(result, Err(ConfigError::DuplicateProcess { id }) if id == "fa"));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut bad = process("x");
        bad.status_url = "not a url".to_string();
        let config = PageConfig {
            processes: vec![bad],
            ..Default::default()
        };

        let result = ProcessRegistry::from_config(&config);
        assert!(matches!(result, Err(ConfigError::InvalidUrl { value, .. }) if value == "not a url"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ProcessRegistry::from_config(&PageConfig::default()).expect("empty is fine");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_longest_interval_is_the_floor() {
        let mut slow = process("slow");
        slow.poll_interval_ms = Some(10_000);
        let mut fast = process("fast");
        fast.poll_interval_ms = Some(500);
        let config = PageConfig {
            processes: vec![slow, fast, process("plain")],
            ..Default::default()
        };
        let registry = ProcessRegistry::from_config(&config).expect("Failed to build registry");

        assert_eq!(
            registry.longest_interval(Duration::from_secs(5)),
            Duration::from_secs(10)
        );
        assert_eq!(
            registry.longest_interval(Duration::from_secs(30)),
            Duration::from_secs(30)
        );
    }
}
