// Adapters layer: concrete implementations of the domain ports
// (geocoding HTTP, position, console, speech).

pub mod console;
pub mod nominatim;
pub mod position;
pub mod speech;
