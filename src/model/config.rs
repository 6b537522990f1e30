use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::entry::FieldNames;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub fields: FieldNames,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the key-value store. Defaults to the XDG data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Hours added/removed by Up/Down in the time field
    #[serde(default = "default_time_step")]
    pub time_step: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            time_step: default_time_step(),
        }
    }
}

fn default_time_step() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Color overrides by theme slot name (e.g. `background = "#101010"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.fields, FieldNames::default());
        assert_eq!(config.form.time_step, 0.5);
        assert!(config.ui.show_key_hints);
    }

    #[test]
    fn partial_field_names() {
        let config: AppConfig = toml::from_str(
            r#"
[fields]
customer = "client"

[form]
time_step = 0.25
"#,
        )
        .unwrap();
        assert_eq!(config.fields.customer, "client");
        assert_eq!(config.fields.project, "project");
        assert_eq!(config.form.time_step, 0.25);
    }
}
