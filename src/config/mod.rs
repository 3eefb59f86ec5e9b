mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{BrokerSettings, HistorySettings, LoggingSettings, Settings};

/// Prefix for environment overrides, e.g. `CHATCORE_BROKER__INPUT_CAPACITY=256`.
pub const ENV_PREFIX: &str = "CHATCORE";

/// Loads the configuration from the default file and environment variables
/// Merges the configuration with default values
/// Returns a validated `Settings` struct
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as [`load_config`] with an explicit base name for the file source
/// (any extension the `config` crate understands).
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    let settings = Settings::merge(partial);
    settings.validate().map_err(ConfigError::Message)?;
    Ok(settings)
}

#[cfg(test)]
mod tests;
