pub mod error;
pub mod key_normalize;
pub mod ocpp_frame;
pub mod percent_decode;
pub mod shutdown;
pub mod time;

pub use error::{DomainError, DomainResult};
pub use ocpp_frame::OcppFrame;
