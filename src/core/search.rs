use crate::core::location::{location_failure_status, LocationService};
use crate::domain::model::{MarkerId, Place, ViewBox, ZoomLevels};
use crate::domain::ports::{Feedback, Geocoder, MapSurface, PositionProvider};
use crate::utils::error::{Result, VoiceMapError};
use std::time::Duration;

pub const ROUTING_UNAVAILABLE: &str = "Routing feature is under development.";
pub const EMPTY_QUERY: &str = "Please say a place to search for.";

/// 透過 geocoder 做文字搜尋，結果以標記呈現
pub struct PlaceSearch<G: Geocoder> {
    geocoder: G,
    timeout: Duration,
    nearby_half_width: f64,
}

impl<G: Geocoder> PlaceSearch<G> {
    pub fn new(geocoder: G, timeout: Duration, nearby_half_width: f64) -> Self {
        Self {
            geocoder,
            timeout,
            nearby_half_width,
        }
    }

    async fn search(&self, query: &str, viewbox: Option<ViewBox>) -> Result<Vec<Place>> {
        match tokio::time::timeout(self.timeout, self.geocoder.search(query, viewbox)).await {
            Ok(result) => result,
            Err(_) => Err(VoiceMapError::TimeoutError {
                operation: "Geocoding".to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }

    /// 只取第一筆結果
    pub async fn find_place<M>(
        &self,
        query: &str,
        map: &mut M,
        feedback: &dyn Feedback,
        zoom: u8,
    ) -> Option<MarkerId>
    where
        M: MapSurface + ?Sized,
    {
        let query = query.trim();
        if query.is_empty() {
            feedback.set_status(EMPTY_QUERY);
            return None;
        }

        feedback.set_status(&format!("Searching for {}...", query));

        let places = match self.search(query, None).await {
            Ok(places) => places,
            Err(e) => {
                tracing::error!("❌ Search for '{}' failed: {}", query, e);
                feedback.set_status(&format!(
                    "Search failed for \"{}\". Please try again.",
                    query
                ));
                return None;
            }
        };

        let Some(first) = places.first() else {
            feedback.set_status(&format!("No results found for \"{}\".", query));
            return None;
        };

        let position = first.coordinate();
        map.set_view(position, zoom);
        let id = map.add_marker(position, Some(query.to_string()), true);
        tracing::info!("Found '{}' at {} ({})", query, position, first.display_name);
        feedback.set_status(&format!("Showing location: {}", query));
        Some(id)
    }

    /// 先經由定位服務重新取得位置，再為範圍內每筆結果加一個標記
    pub async fn find_nearby<M, P>(
        &self,
        category: &str,
        location: &mut LocationService<P>,
        map: &mut M,
        feedback: &dyn Feedback,
        zooms: &ZoomLevels,
    ) -> Vec<MarkerId>
    where
        M: MapSurface + ?Sized,
        P: PositionProvider,
    {
        let category = category.trim();
        if category.is_empty() {
            feedback.set_status(EMPTY_QUERY);
            return Vec::new();
        }

        let position = match location.locate(map, zooms.nearby).await {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!("Geolocation error before nearby search: {}", e);
                feedback.set_status(location_failure_status(&e));
                return Vec::new();
            }
        };

        feedback.set_status(&format!("Searching for nearby {}...", category));

        let viewbox = ViewBox::around(position, self.nearby_half_width);
        let places = match self.search(category, Some(viewbox)).await {
            Ok(places) => places,
            Err(e) => {
                tracing::error!("❌ Nearby search for '{}' failed: {}", category, e);
                feedback.set_status(&format!("Nearby search failed for {}.", category));
                return Vec::new();
            }
        };

        let ids: Vec<MarkerId> = places
            .iter()
            .map(|place| {
                map.add_marker(place.coordinate(), Some(place.display_name.clone()), false)
            })
            .collect();

        tracing::info!("{} nearby result(s) for '{}'", ids.len(), category);
        if ids.is_empty() {
            feedback.set_status(&format!("No {} found nearby.", category));
        } else {
            feedback.set_status(&format!("Found nearby {}.", category));
        }
        ids
    }

    /// 尚無路線規劃後端，只回覆確認訊息
    pub fn plan_route(&self, source: &str, destination: &str, feedback: &dyn Feedback) {
        feedback.set_status(&format!(
            "Finding route from {} to {}...",
            source.trim(),
            destination.trim()
        ));
        feedback.acknowledge(ROUTING_UNAVAILABLE);
    }
}
