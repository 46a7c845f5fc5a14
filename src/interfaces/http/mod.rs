//! HTTP control/query surface (§6): the operator-facing REST API, separate
//! from the OCPP WebSocket server in `interfaces::ws`.

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
