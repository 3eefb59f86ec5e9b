use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for the broker, the message history and logging.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub history: HistorySettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the broker.
///
/// `input_capacity` bounds the queue between producers and the dispatch task.
/// `inbox_capacity` is the per-participant queue size used when a caller does
/// not choose one.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    pub input_capacity: usize,
    pub inbox_capacity: usize,
}

/// Configuration settings for the message history recorder.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistorySettings {
    pub enabled: bool,
    pub participant_id: String,
    pub capacity: usize,
    pub inbox_capacity: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub broker: Option<PartialBrokerSettings>,
    pub history: Option<PartialHistorySettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub input_capacity: Option<usize>,
    pub inbox_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHistorySettings {
    pub enabled: Option<bool>,
    pub participant_id: Option<String>,
    pub capacity: Option<usize>,
    pub inbox_capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            broker: BrokerSettings {
                input_capacity: 100,
                inbox_capacity: 16,
            },
            history: HistorySettings {
                enabled: true,
                participant_id: "history".to_string(),
                capacity: 100,
                inbox_capacity: 64,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// Fill every field missing from `partial` with its default.
    pub fn merge(partial: PartialSettings) -> Self {
        let default = Settings::default();
        let broker = partial.broker;
        let history = partial.history;
        let logging = partial.logging;

        Settings {
            broker: BrokerSettings {
                input_capacity: broker
                    .as_ref()
                    .and_then(|b| b.input_capacity)
                    .unwrap_or(default.broker.input_capacity),
                inbox_capacity: broker
                    .as_ref()
                    .and_then(|b| b.inbox_capacity)
                    .unwrap_or(default.broker.inbox_capacity),
            },
            history: HistorySettings {
                enabled: history
                    .as_ref()
                    .and_then(|h| h.enabled)
                    .unwrap_or(default.history.enabled),
                participant_id: history
                    .as_ref()
                    .and_then(|h| h.participant_id.clone())
                    .unwrap_or(default.history.participant_id),
                capacity: history
                    .as_ref()
                    .and_then(|h| h.capacity)
                    .unwrap_or(default.history.capacity),
                inbox_capacity: history
                    .as_ref()
                    .and_then(|h| h.inbox_capacity)
                    .unwrap_or(default.history.inbox_capacity),
            },
            logging: LoggingSettings {
                level: logging
                    .and_then(|l| l.level)
                    .unwrap_or(default.logging.level),
            },
        }
    }

    /// Reject values the broker cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.broker.input_capacity == 0 {
            return Err("broker.input_capacity must be greater than zero".to_string());
        }
        if self.broker.inbox_capacity == 0 {
            return Err("broker.inbox_capacity must be greater than zero".to_string());
        }
        if self.history.capacity == 0 {
            return Err("history.capacity must be greater than zero".to_string());
        }
        if self.history.inbox_capacity == 0 {
            return Err("history.inbox_capacity must be greater than zero".to_string());
        }
        if self.history.participant_id.trim().is_empty() {
            return Err("history.participant_id must not be empty".to_string());
        }
        Ok(())
    }
}
