pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::adapters::{
    console::ConsoleFeedback, nominatim::NominatimGeocoder, position::PositionSource,
};
pub use crate::config::AppConfig;
pub use crate::core::{app::VoiceMap, map::MemoryMap};
pub use crate::utils::error::{Result, VoiceMapError};

use crate::core::app::AppSettings;
use crate::core::dispatcher::CommandDispatcher;
use crate::core::location::LocationService;
use crate::core::search::PlaceSearch;
use std::time::Duration;

pub type DefaultVoiceMap = VoiceMap<MemoryMap, PositionSource, NominatimGeocoder, ConsoleFeedback>;

/// 依設定組出完整的應用程式
pub fn build_app<G, F>(
    config: &AppConfig,
    geocoder: G,
    feedback: F,
) -> Result<VoiceMap<MemoryMap, PositionSource, G, F>>
where
    G: crate::domain::ports::Geocoder,
    F: crate::domain::ports::Feedback,
{
    let location = LocationService::new(
        PositionSource::from_config(&config.location)?,
        Duration::from_secs(config.location.timeout_seconds),
    );
    let search = PlaceSearch::new(
        geocoder,
        Duration::from_secs(config.geocoder.timeout_seconds),
        config.geocoder.nearby_half_width,
    );

    Ok(VoiceMap::new(
        MemoryMap::from_config(config),
        location,
        search,
        CommandDispatcher::with_defaults()?,
        feedback,
        AppSettings::from_config(config),
    ))
}

pub fn build_default_app(config: &AppConfig) -> Result<DefaultVoiceMap> {
    build_app(config, NominatimGeocoder::new(&config.geocoder)?, ConsoleFeedback::new())
}
