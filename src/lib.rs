/// Byte ring buffer and buffer pool.
pub mod buffer;
/// Application settings loading.
pub mod config;
/// Error types for the broker, options, buffers, networking and logging.
pub mod error;
/// Logging setup (filters, formats, file output) and the `Logger` facade.
pub mod logging;
/// Network server interfaces: handlers, connections, codecs.
pub mod network;
/// In-process Pub/Sub broker.
pub mod pubsub;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Buffers.
pub use buffer::{Buffer, BufferPool, RingBuffer, DEFAULT_BUFFER_CAPACITY};
/// config
pub use config::Settings;
/// Operation errors and result types.
pub use error::{BrokerError, BrokerResult, BufferError, LoggingError, NetworkError, OptionError};
/// Logging.
pub use logging::{init_logging, Level, Logger, LoggingConfig, LoggingHandle};
/// Pub/Sub API.
pub use pubsub::{
    with_extension, with_timeout, with_topic, Broker, BrokerConfig, BrokerOption, MemoryBroker,
    Options, PublishItem,
};
