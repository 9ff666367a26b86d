use crate::config::AppConfig;
use crate::domain::model::{Coordinate, Marker, MarkerId, Viewport};
use crate::domain::ports::MapSurface;
use std::collections::BTreeMap;

/// 行程內的地圖：保存視窗與所有標記，不做繪製
#[derive(Debug, Clone)]
pub struct MemoryMap {
    viewport: Viewport,
    min_zoom: u8,
    max_zoom: u8,
    markers: BTreeMap<MarkerId, Marker>,
    next_id: u64,
}

impl MemoryMap {
    pub fn new(center: Coordinate, zoom: u8, min_zoom: u8, max_zoom: u8) -> Self {
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };

        Self {
            viewport: Viewport {
                center,
                zoom: zoom.clamp(min_zoom, max_zoom),
            },
            min_zoom,
            max_zoom,
            markers: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Coordinate::new(config.map.latitude, config.map.longitude),
            config.map.zoom,
            config.map.min_zoom,
            config.map.max_zoom,
        )
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

impl MapSurface for MemoryMap {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.viewport = Viewport {
            center,
            zoom: self.clamp_zoom(zoom),
        };
        tracing::debug!("Viewport -> {} @ z{}", center, self.viewport.zoom);
    }

    fn zoom_in(&mut self) -> u8 {
        self.viewport.zoom = self.clamp_zoom(self.viewport.zoom.saturating_add(1));
        self.viewport.zoom
    }

    fn zoom_out(&mut self) -> u8 {
        self.viewport.zoom = self.clamp_zoom(self.viewport.zoom.saturating_sub(1));
        self.viewport.zoom
    }

    fn add_marker(&mut self, position: Coordinate, popup: Option<String>, open: bool) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;

        // 同一時間只會有一個展開的 popup
        let popup_open = open && popup.is_some();
        if popup_open {
            for marker in self.markers.values_mut() {
                marker.popup_open = false;
            }
        }

        self.markers.insert(
            id,
            Marker {
                id,
                position,
                popup,
                popup_open,
            },
        );
        tracing::debug!("Marker {:?} added at {}", id, position);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    fn markers(&self) -> Vec<Marker> {
        self.markers.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> MemoryMap {
        MemoryMap::new(Coordinate::new(20.5937, 78.9629), 5, 0, 18)
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut map = map();
        assert_eq!(map.zoom_in(), 6);
        assert_eq!(map.zoom_out(), 5);

        map.set_view(Coordinate::new(0.0, 0.0), 30);
        assert_eq!(map.viewport().zoom, 18);
        assert_eq!(map.zoom_in(), 18);

        map.set_view(Coordinate::new(0.0, 0.0), 0);
        assert_eq!(map.zoom_out(), 0);
    }

    #[test]
    fn test_markers_get_unique_ids_and_can_be_removed() {
        let mut map = map();
        let a = map.add_marker(Coordinate::new(1.0, 1.0), None, false);
        let b = map.add_marker(Coordinate::new(2.0, 2.0), Some("b".into()), false);
        assert_ne!(a, b);
        assert_eq!(map.marker_count(), 2);

        assert!(map.remove_marker(a));
        assert!(!map.remove_marker(a));
        assert_eq!(map.markers().len(), 1);
    }

    #[test]
    fn test_opening_a_popup_closes_the_others() {
        let mut map = map();
        let a = map.add_marker(Coordinate::new(1.0, 1.0), Some("a".into()), true);
        let b = map.add_marker(Coordinate::new(2.0, 2.0), Some("b".into()), true);
        assert!(!map.marker(a).unwrap().popup_open);
        assert!(map.marker(b).unwrap().popup_open);

        // 沒有 popup 的標記不算展開
        let c = map.add_marker(Coordinate::new(3.0, 3.0), None, true);
        assert!(!map.marker(c).unwrap().popup_open);
        assert!(map.marker(b).unwrap().popup_open);
    }

    #[test]
    fn test_initial_zoom_is_clamped() {
        let map = MemoryMap::new(Coordinate::new(0.0, 0.0), 25, 2, 18);
        assert_eq!(map.viewport().zoom, 18);
    }
}
