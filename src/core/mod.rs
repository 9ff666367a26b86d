pub mod app;
pub mod commands;
pub mod dispatcher;
pub mod location;
pub mod map;
pub mod pattern;
pub mod search;

pub use crate::domain::model::{Coordinate, Marker, MarkerId, Place, ViewBox, Viewport, ZoomLevels};
pub use crate::domain::ports::{Feedback, Geocoder, MapSurface, PositionProvider, SpeechSource};
pub use crate::utils::error::Result;
