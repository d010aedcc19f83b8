pub mod config;
pub mod console;
pub mod ws2812;

#[cfg(target_os = "espidf")]
pub mod nvs;

pub use config::Ws2812Config;
