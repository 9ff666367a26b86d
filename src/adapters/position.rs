use crate::config::toml_config::{LocationConfig, LocationProviderKind};
use crate::domain::model::Coordinate;
use crate::domain::ports::PositionProvider;
use crate::utils::error::{Result, VoiceMapError};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 永遠回報同一個座標 (例如設定檔中的固定位置)
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionProvider {
    position: Coordinate,
}

impl FixedPositionProvider {
    pub fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

#[async_trait]
impl PositionProvider for FixedPositionProvider {
    async fn current_position(&self) -> Result<Coordinate> {
        Ok(self.position)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPositionProvider;

#[async_trait]
impl PositionProvider for UnsupportedPositionProvider {
    async fn current_position(&self) -> Result<Coordinate> {
        Err(VoiceMapError::UnsupportedError {
            capability: "Geolocation".to_string(),
        })
    }
}

/// 透過 IP 定位服務取得大略位置
pub struct IpPositionProvider {
    client: Client,
    endpoint: String,
}

// ip-api.com 用 lat/lon，ipapi.co 用 latitude/longitude
#[derive(Debug, Deserialize)]
struct IpLocation {
    status: Option<String>,
    message: Option<String>,
    #[serde(alias = "latitude")]
    lat: Option<f64>,
    #[serde(alias = "longitude")]
    lon: Option<f64>,
}

impl IpPositionProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl PositionProvider for IpPositionProvider {
    async fn current_position(&self) -> Result<Coordinate> {
        tracing::debug!("Requesting IP position from: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(VoiceMapError::PositionError {
                reason: format!("location service returned HTTP {}", response.status()),
            });
        }

        let body = response.text().await?;
        let location: IpLocation = serde_json::from_str(&body)?;

        if location.status.as_deref() == Some("fail") {
            return Err(VoiceMapError::PositionError {
                reason: location
                    .message
                    .unwrap_or_else(|| "location lookup failed".to_string()),
            });
        }

        match (location.lat, location.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinate::new(lat, lon)),
            _ => Err(VoiceMapError::PositionError {
                reason: "response has no coordinates".to_string(),
            }),
        }
    }
}

/// 依 `[location]` 設定選擇的定位來源
pub enum PositionSource {
    Fixed(FixedPositionProvider),
    Ip(IpPositionProvider),
    Unsupported(UnsupportedPositionProvider),
}

impl PositionSource {
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        let source = match config.provider {
            LocationProviderKind::Fixed => {
                let latitude = validate_required_field("location.latitude", &config.latitude)?;
                let longitude = validate_required_field("location.longitude", &config.longitude)?;
                PositionSource::Fixed(FixedPositionProvider::new(Coordinate::new(
                    *latitude, *longitude,
                )))
            }
            LocationProviderKind::Ip => PositionSource::Ip(IpPositionProvider::new(
                config.endpoint.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?),
            LocationProviderKind::None => PositionSource::Unsupported(UnsupportedPositionProvider),
        };
        Ok(source)
    }
}

#[async_trait]
impl PositionProvider for PositionSource {
    async fn current_position(&self) -> Result<Coordinate> {
        match self {
            PositionSource::Fixed(provider) => provider.current_position().await,
            PositionSource::Ip(provider) => provider.current_position().await,
            PositionSource::Unsupported(provider) => provider.current_position().await,
        }
    }
}
