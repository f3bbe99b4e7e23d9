// Domain layer: text artifacts, rules and ports. No I/O here.

pub mod model;
pub mod ports;
