//! Device configuration

mod settings;

pub use settings::DeviceConfig;
