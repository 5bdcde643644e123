use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub uploads: UploadLimits,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Port of the HR API on the same host the console is served from
    pub port: u16,
    /// Shown to the user while a finalize request is pending
    pub slow_request_hint_secs: u32,
}

/// Size ceilings in megabytes. Only a courtesy: the server has its own.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UploadLimits {
    pub exam_mb: u32,
    pub diploma_mb: u32,
    pub attendance_sheet_mb: u32,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[api]
port = 3000
slow_request_hint_secs = 10

[uploads]
exam_mb = 10
diploma_mb = 10
attendance_sheet_mb = 30
"#;

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                port: 3000,
                slow_request_hint_secs: 10,
            },
            uploads: UploadLimits {
                exam_mb: 10,
                diploma_mb: 10,
                attendance_sheet_mb: 30,
            },
        }
    }
}

/// Load configuration
///
/// Search order:
/// 1. Override document supplied by the host (browser storage)
/// 2. Falls back to embedded default config
pub fn load_config(override_toml: Option<&str>) -> anyhow::Result<ConsoleConfig> {
    match override_toml.map(str::trim).filter(|s| !s.is_empty()) {
        Some(contents) => {
            log::info!("Loading console config from override");
            let config: ConsoleConfig = toml::from_str(contents)?;
            Ok(config)
        }
        None => {
            log::info!("Using default embedded configuration");
            let config: ConsoleConfig = toml::from_str(DEFAULT_CONFIG)?;
            Ok(config)
        }
    }
}
