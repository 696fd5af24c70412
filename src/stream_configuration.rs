//! Configuration types for event streams

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Predicate deciding whether a published value closes the stream
pub type TerminalPredicate<T> = Rc<dyn Fn(&T) -> bool>;

/// Largest subscriber list capacity reserved up front
pub const MAX_SUBSCRIBER_CAPACITY: usize = 1024;

/// Plain, serializable part of a stream configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Name used in log lines
    pub label: Option<String>,
    /// Initial capacity of the subscriber list
    pub subscriber_capacity: usize,
    /// Record publish/delivery counters
    pub metrics_enabled: bool,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            label: None,
            subscriber_capacity: 4,
            metrics_enabled: false,
        }
    }
}

impl StreamSettings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: StreamSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "label must not be blank".to_string(),
                ));
            }
        }
        if self.subscriber_capacity > MAX_SUBSCRIBER_CAPACITY {
            return Err(ConfigError::Validation(format!(
                "subscriber_capacity {} exceeds the maximum of {}",
                self.subscriber_capacity, MAX_SUBSCRIBER_CAPACITY
            )));
        }
        Ok(())
    }
}

/// Configuration for a single event stream
pub struct StreamConfig<T> {
    pub settings: StreamSettings,
    pub terminal: Option<TerminalPredicate<T>>,
}

impl<T> Clone for StreamConfig<T> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            terminal: self.terminal.clone(),
        }
    }
}

impl<T> fmt::Debug for StreamConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamConfig")
            .field("settings", &self.settings)
            .field(
                "terminal",
                &if self.terminal.is_some() {
                    "Some(TerminalPredicate)"
                } else {
                    "None"
                },
            )
            .finish()
    }
}

impl<T> Default for StreamConfig<T> {
    fn default() -> Self {
        Self {
            settings: StreamSettings::default(),
            terminal: None,
        }
    }
}

impl<T> StreamConfig<T> {
    /// Create a new stream configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from loaded settings
    pub fn from_settings(settings: StreamSettings) -> Self {
        Self {
            settings,
            terminal: None,
        }
    }

    /// Set the label used in log lines
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.settings.label = Some(label.into());
        self
    }

    /// Set the initial capacity of the subscriber list, capped at
    /// [`MAX_SUBSCRIBER_CAPACITY`] when the stream is created
    pub fn subscriber_capacity(mut self, capacity: usize) -> Self {
        self.settings.subscriber_capacity = capacity;
        self
    }

    /// Enable or disable metrics recording
    pub fn metrics(mut self, enabled: bool) -> Self {
        self.settings.metrics_enabled = enabled;
        self
    }

    /// Designate the values that close the stream once published
    pub fn terminal<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.terminal = Some(Rc::new(predicate));
        self
    }
}
