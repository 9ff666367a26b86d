use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 緯度/經度 (度)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// 顯示到小數點第四位，例如 `48.8566, 2.3522`
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Coordinate,
    pub popup: Option<String>,
    pub popup_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: u8,
}

/// 指令重新置中地圖時使用的縮放等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLevels {
    pub located: u8,
    pub report: u8,
    pub nearby: u8,
    pub place: u8,
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self {
            located: 12,
            report: 15,
            nearby: 14,
            place: 12,
        }
    }
}

/// 搜尋範圍，依 geocoder `viewbox` 的順序：`minLon,maxLat,maxLon,minLat`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
    pub min_lat: f64,
}

impl ViewBox {
    pub fn around(center: Coordinate, half_width: f64) -> Self {
        Self {
            min_lon: center.longitude - half_width,
            max_lat: center.latitude + half_width,
            max_lon: center.longitude + half_width,
            min_lat: center.latitude - half_width,
        }
    }

    pub fn to_query_value(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.max_lat, self.max_lon, self.min_lat
        )
    }
}

/// 一筆 geocoder 結果
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    #[serde(deserialize_with = "de_degrees")]
    pub lat: f64,
    #[serde(deserialize_with = "de_degrees")]
    pub lon: f64,
    pub display_name: String,
}

impl Place {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

// Nominatim 回傳字串 "48.8566"，其他服務可能直接給數字
fn de_degrees<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    match Degrees::deserialize(deserializer)? {
        Degrees::Number(value) => Ok(value),
        Degrees::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
