use crate::domain::model::{Coordinate, MarkerId};
use crate::domain::ports::{Feedback, MapSurface, PositionProvider};
use crate::utils::error::{Result, VoiceMapError};
use std::time::Duration;

pub const LOCATING: &str = "Getting your location...";
pub const LOCATION_FAILED: &str = "Unable to fetch location.";
pub const LOCATION_UNSUPPORTED: &str = "Geolocation not supported";
pub const LOCATION_PENDING: &str = "Your location is not available yet";
pub const YOU_ARE_HERE: &str = "You are here";

/// 目前位置的唯一擁有者與寫入者；其他元件只讀 `current()`
pub struct LocationService<P: PositionProvider> {
    provider: P,
    timeout: Duration,
    current: Option<Coordinate>,
    marker: Option<MarkerId>,
}

impl<P: PositionProvider> LocationService<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            current: None,
            marker: None,
        }
    }

    pub fn current(&self) -> Option<Coordinate> {
        self.current
    }

    pub fn marker(&self) -> Option<MarkerId> {
        self.marker
    }

    /// 單次定位。成功時更新共用位置與「目前位置」標記，並以 `zoom` 重新置中；失敗時不做任何變更。
    pub async fn locate<M>(&mut self, map: &mut M, zoom: u8) -> Result<Coordinate>
    where
        M: MapSurface + ?Sized,
    {
        let position = match tokio::time::timeout(self.timeout, self.provider.current_position())
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(VoiceMapError::TimeoutError {
                    operation: "Geolocation".to_string(),
                    seconds: self.timeout.as_secs(),
                })
            }
        };

        if let Some(previous) = self.marker.take() {
            map.remove_marker(previous);
        }
        self.marker = Some(map.add_marker(position, Some(YOU_ARE_HERE.to_string()), true));
        self.current = Some(position);
        map.set_view(position, zoom);

        tracing::info!("📍 Position updated: {}", position);
        Ok(position)
    }

    pub async fn refresh_location<M>(&mut self, map: &mut M, feedback: &dyn Feedback, zoom: u8)
    where
        M: MapSurface + ?Sized,
    {
        feedback.set_status(LOCATING);

        match self.locate(map, zoom).await {
            Ok(position) => feedback.set_status(&format!("Location found: {}", position)),
            Err(e) => {
                tracing::warn!("Geolocation error: {}", e);
                feedback.set_status(location_failure_status(&e));
            }
        }
    }

    /// 以快取位置置中，沒有快取時改為重新定位
    pub async fn report_location<M>(
        &mut self,
        map: &mut M,
        feedback: &dyn Feedback,
        report_zoom: u8,
        located_zoom: u8,
    ) where
        M: MapSurface + ?Sized,
    {
        match self.current {
            Some(position) => {
                map.set_view(position, report_zoom);
                feedback.set_status(&format!("Your location: {}", position));
            }
            None => {
                feedback.set_status(LOCATION_PENDING);
                self.refresh_location(map, feedback, located_zoom).await;
            }
        }
    }
}

pub fn location_failure_status(error: &VoiceMapError) -> &'static str {
    match error {
        VoiceMapError::UnsupportedError { .. } => LOCATION_UNSUPPORTED,
        _ => LOCATION_FAILED,
    }
}
