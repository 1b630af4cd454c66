pub mod dmi_platform;

pub use dmi_platform::DmiPlatformResolver;
