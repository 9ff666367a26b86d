// Domain layer: map/location/search models and the ports (interfaces) to the outside world.

pub mod model;
pub mod ports;
