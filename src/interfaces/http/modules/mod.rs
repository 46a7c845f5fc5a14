pub mod cards;
pub mod charge_points;
pub mod community;
pub mod connections;
pub mod debug;
pub mod health;
pub mod metrics;
pub mod tariffs;
