pub mod devices;
pub mod journeys;

pub use devices::DeviceService;
pub use journeys::JourneyService;
