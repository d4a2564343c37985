pub mod headers;
pub mod logging;

pub use headers::security_headers;
pub use logging::request_logger;
