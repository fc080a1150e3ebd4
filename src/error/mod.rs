pub mod broker;
pub mod buffer;
pub mod logging;
pub mod network;
pub mod options;

pub use broker::{BrokerError, BrokerResult};
pub use memq_error::{ErrorExt, StatusCode};
pub use buffer::BufferError;
pub use logging::LoggingError;
pub use network::NetworkError;
pub use options::OptionError;
