pub mod api;

pub use api::configure_app;
