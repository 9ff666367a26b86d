use crate::domain::model::ZoomLevels;
use crate::utils::error::{Result, VoiceMapError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "voice-map.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub geocoder: GeocoderConfig,
    pub location: LocationConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub zoom_levels: ZoomLevels,
}

impl Default for MapConfig {
    fn default() -> Self {
        // 預設中心：印度
        Self {
            latitude: 20.5937,
            longitude: 78.9629,
            zoom: 5,
            min_zoom: 0,
            max_zoom: 18,
            zoom_levels: ZoomLevels::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// "find ... near me" 搜尋範圍的半寬 (度)
    pub nearby_half_width: f64,
    pub language: Option<String>,
    pub limit: Option<u32>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: format!("voice-map/{}", env!("CARGO_PKG_VERSION")),
            timeout_seconds: 10,
            nearby_half_width: 0.05,
            language: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationProviderKind {
    Fixed,
    Ip,
    None,
}

impl std::str::FromStr for LocationProviderKind {
    type Err = VoiceMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(LocationProviderKind::Fixed),
            "ip" => Ok(LocationProviderKind::Ip),
            "none" => Ok(LocationProviderKind::None),
            other => Err(VoiceMapError::InvalidConfigValueError {
                field: "location.provider".to_string(),
                value: other.to_string(),
                reason: "Valid providers: fixed, ip, none".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub provider: LocationProviderKind,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: LocationProviderKind::Ip,
            latitude: None,
            longitude: None,
            endpoint: "http://ip-api.com/json".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub language: String,
    pub continuous: bool,
    pub auto_restart: bool,
    pub restart_throttle_ms: u64,
    pub alternative_separator: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en-US".to_string(),
            continuous: true,
            auto_restart: true,
            restart_throttle_ms: 1000,
            alternative_separator: "|".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VoiceMapError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| VoiceMapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEOCODER_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| VoiceMapError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_range("map.latitude", self.map.latitude, -90.0, 90.0)?;
        validate_range("map.longitude", self.map.longitude, -180.0, 180.0)?;
        validate_range("map.max_zoom", self.map.max_zoom, 0, 22)?;
        validate_range("map.min_zoom", self.map.min_zoom, 0, self.map.max_zoom)?;
        validate_range("map.zoom", self.map.zoom, self.map.min_zoom, self.map.max_zoom)?;

        validate_url("geocoder.endpoint", &self.geocoder.endpoint)?;
        validate_non_empty_string("geocoder.user_agent", &self.geocoder.user_agent)?;
        validate_positive_number("geocoder.timeout_seconds", self.geocoder.timeout_seconds, 1)?;
        validate_range(
            "geocoder.nearby_half_width",
            self.geocoder.nearby_half_width,
            0.0001,
            10.0,
        )?;

        validate_positive_number("location.timeout_seconds", self.location.timeout_seconds, 1)?;
        match self.location.provider {
            LocationProviderKind::Fixed => {
                let latitude =
                    validate_required_field("location.latitude", &self.location.latitude)?;
                let longitude =
                    validate_required_field("location.longitude", &self.location.longitude)?;
                validate_range("location.latitude", *latitude, -90.0, 90.0)?;
                validate_range("location.longitude", *longitude, -180.0, 180.0)?;
            }
            LocationProviderKind::Ip => validate_url("location.endpoint", &self.location.endpoint)?,
            LocationProviderKind::None => {}
        }

        validate_non_empty_string("speech.language", &self.speech.language)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
