pub mod device;
pub mod journey;
