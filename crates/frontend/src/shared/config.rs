use contracts::shared::config::{load_config, ConsoleConfig};
use web_sys::window;

const CONFIG_OVERRIDE_KEY: &str = "console_config";

fn read_override() -> Option<String> {
    window()?
        .local_storage()
        .ok()??
        .get_item(CONFIG_OVERRIDE_KEY)
        .ok()?
}

/// Load console config: localStorage override, else the embedded default.
/// A broken override is logged and ignored.
pub fn load_console_config() -> ConsoleConfig {
    match load_config(read_override().as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Ignoring invalid '{}' override: {}", CONFIG_OVERRIDE_KEY, e);
            ConsoleConfig::default()
        }
    }
}
