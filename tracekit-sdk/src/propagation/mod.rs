//! Propagators carrying trace identity across process boundaries.

mod b3;

pub use b3::B3Propagator;
