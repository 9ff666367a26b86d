use crate::config::toml_config::GeocoderConfig;
use crate::domain::model::{Place, ViewBox};
use crate::domain::ports::Geocoder;
use crate::utils::error::{Result, VoiceMapError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// 相容 Nominatim `/search` 的客戶端
pub struct NominatimGeocoder {
    client: Client,
    endpoint: Url,
    language: Option<String>,
    limit: Option<u32>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            VoiceMapError::InvalidConfigValueError {
                field: "geocoder.endpoint".to_string(),
                value: config.endpoint.clone(),
                reason: e.to_string(),
            }
        })?;

        // Nominatim 的使用政策要求帶 User-Agent
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            language: config.language.clone(),
            limit: config.limit,
        })
    }

    pub fn request_url(&self, query: &str, viewbox: Option<ViewBox>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("q", query);
            if let Some(viewbox) = viewbox {
                pairs.append_pair("viewbox", &viewbox.to_query_value());
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            if let Some(language) = &self.language {
                pairs.append_pair("accept-language", language);
            }
        }
        url
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str, viewbox: Option<ViewBox>) -> Result<Vec<Place>> {
        let url = self.request_url(query, viewbox);
        tracing::debug!("Geocoding request: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Geocoding response status: {}", status);

        if !status.is_success() {
            return Err(VoiceMapError::GeocodingError {
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await?;
        let places: Vec<Place> = serde_json::from_str(&body)?;
        tracing::debug!("Geocoder returned {} place(s) for '{}'", places.len(), query);
        Ok(places)
    }
}
