use crate::config::toml_config::{AppConfig, LocationProviderKind, DEFAULT_CONFIG_FILE};
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "voice-map")]
#[command(about = "Voice-controlled map: speak commands, move the map")]
pub struct CliArgs {
    /// Path to TOML configuration file (defaults to ./voice-map.toml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(long)]
    pub geocoder_endpoint: Option<String>,

    /// fixed | ip | none
    #[arg(long)]
    pub location_provider: Option<LocationProviderKind>,

    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Stop listening when the recognizer ends instead of restarting it
    #[arg(long)]
    pub no_auto_restart: bool,
}

impl CliArgs {
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                AppConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => AppConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// 命令列參數優先於設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.geocoder_endpoint {
            config.geocoder.endpoint = endpoint.clone();
        }
        if let Some(provider) = self.location_provider {
            config.location.provider = provider;
        }
        if self.latitude.is_some() || self.longitude.is_some() {
            config.location.latitude = self.latitude.or(config.location.latitude);
            config.location.longitude = self.longitude.or(config.location.longitude);
            // 只給座標時視為固定位置
            if self.location_provider.is_none() {
                config.location.provider = LocationProviderKind::Fixed;
            }
        }
        if self.no_auto_restart {
            config.speech.auto_restart = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_imply_fixed_provider() {
        let args = CliArgs::parse_from([
            "voice-map",
            "--latitude",
            "-33.87",
            "--longitude",
            "151.21",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.location.provider, LocationProviderKind::Fixed);
        assert_eq!(config.location.latitude, Some(-33.87));
        assert_eq!(config.location.longitude, Some(151.21));
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::parse_from([
            "voice-map",
            "--geocoder-endpoint",
            "http://localhost:8080/search",
            "--location-provider",
            "none",
            "--no-auto-restart",
        ]);
        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.geocoder.endpoint, "http://localhost:8080/search");
        assert_eq!(config.location.provider, LocationProviderKind::None);
        assert!(!config.speech.auto_restart);
    }

    #[test]
    fn test_bad_provider_is_rejected_by_clap() {
        assert!(CliArgs::try_parse_from(["voice-map", "--location-provider", "gps"]).is_err());
    }
}
