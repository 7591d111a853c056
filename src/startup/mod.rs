//! Startup helpers

mod logger;

pub use logger::StartupLogger;
