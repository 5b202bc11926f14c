// Domain layer: planning models and the ports to external collaborators.

pub mod model;
pub mod month;
pub mod ports;
