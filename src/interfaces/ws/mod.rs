pub mod server;

pub use server::{WsServer, WsServerConfig};
