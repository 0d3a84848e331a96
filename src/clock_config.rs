use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::indicator::{DEFAULT_GPIO_PIN, IndicatorKind};
use crate::zones::{self, Zone};

fn default_interval_ms() -> u64 {
    1000
}
fn default_clear_screen() -> bool {
    true
}
fn default_gpio_pin() -> u8 {
    DEFAULT_GPIO_PIN
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClockConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
    #[serde(default)]
    pub indicator: IndicatorKind,
    #[serde(default = "default_gpio_pin")]
    pub gpio_pin: u8,
    #[serde(default = "zones::default_zones")]
    pub zones: Vec<Zone>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            clear_screen: default_clear_screen(),
            indicator: IndicatorKind::default(),
            gpio_pin: default_gpio_pin(),
            zones: zones::default_zones(),
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            bail!("interval_ms must be greater than zero");
        }
        if self.zones.is_empty() {
            bail!("at least one zone must be configured");
        }
        for zone in &self.zones {
            zone.validate()?;
        }
        Ok(())
    }
}

/// Load config from `~/.config/zoneclock/config.toml`. Falls back to defaults on missing/invalid file.
pub fn load_config() -> ClockConfig {
    let loaded = crate::config::config_path().and_then(|path| load_config_from(&path));
    match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{e:#}; using default settings");
            ClockConfig::default()
        }
    }
}

/// Parse and validate a config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<ClockConfig> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(ClockConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: ClockConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{body}").unwrap();
        tmp
    }

    #[test]
    fn missing_file_returns_defaults() {
        let cfg = load_config_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(cfg.interval_ms, 1000);
        assert!(cfg.clear_screen);
        assert_eq!(cfg.indicator, IndicatorKind::Console);
        assert_eq!(cfg.gpio_pin, 17);
        assert_eq!(cfg.zones, zones::default_zones());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = write_config(
            r#"
indicator = "gpio"
gpio_pin = 27
"#,
        );
        let cfg = load_config_from(tmp.path()).unwrap();
        assert_eq!(cfg.indicator, IndicatorKind::Gpio);
        assert_eq!(cfg.gpio_pin, 27);
        assert_eq!(cfg.interval_ms, 1000);
        assert_eq!(cfg.zones.len(), 3);
    }

    #[test]
    fn custom_zones_replace_defaults() {
        let tmp = write_config(
            r#"
interval_ms = 500
clear_screen = false

[[zones]]
name = "UTC"
offset_secs = 0

[[zones]]
name = "NPT"
offset_secs = 20700
"#,
        );
        let cfg = load_config_from(tmp.path()).unwrap();
        assert_eq!(cfg.interval_ms, 500);
        assert!(!cfg.clear_screen);
        assert_eq!(cfg.zones, vec![Zone::new("UTC", 0), Zone::new("NPT", 20_700)]);
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let tmp = write_config(
            r#"
[[zones]]
name = "NOPE"
offset_secs = 90000
"#,
        );
        let err = load_config_from(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));
    }

    #[test]
    fn zero_interval_and_empty_zones_are_rejected() {
        assert!(load_config_from(write_config("interval_ms = 0").path()).is_err());
        assert!(load_config_from(write_config("zones = []").path()).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = write_config("blink_rate = 3");
        assert!(load_config_from(tmp.path()).is_err());
    }
}
