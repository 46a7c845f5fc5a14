//! EV community charging Central System speaking OCPP 1.6J (§1).
//!
//! Layout mirrors the reference server: `domain` (entities, pure rules),
//! `application` (stateful C2-C9 services), `infrastructure` (persistence,
//! crypto), `interfaces` (WebSocket + HTTP), `shared` (cross-cutting
//! helpers), `config` (on-disk settings).

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;
