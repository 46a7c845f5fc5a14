//! Inbound OCPP-J action handlers (§4.5's action table). One module per
//! action, each exposing a single `handle(ctx, payload) -> Value` function
//! called from `OcppHandler::handle_call`.

pub mod authorize;
pub mod boot_notification;
pub mod heartbeat;
pub mod meter_values;
pub mod start_transaction;
pub mod status_notification;
pub mod stop_transaction;
