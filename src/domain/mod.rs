// Domain layer: QSO and label models plus the ports the pipeline is wired through.

pub mod model;
pub mod ports;
