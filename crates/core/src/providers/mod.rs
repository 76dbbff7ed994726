pub mod traits;

// Remote implementations
pub mod http;
