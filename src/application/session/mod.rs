pub mod connection;
pub mod registry;

pub use connection::{Connection, ConnectionSummary, EvictedSession};
pub use registry::{SessionRegistry, SharedSessionRegistry};
