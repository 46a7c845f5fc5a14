//! ChargePoint domain entity (§3).

use chrono::{DateTime, Utc};

/// Administrative state of a charge point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminState {
    Enabled,
    Disabled,
}

impl AdminState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "disabled" => Self::Disabled,
            _ => Self::Enabled,
        }
    }
}

/// A whitelisted charge point (§3 ChargePoint).
///
/// The identifier is opaque UTF-8 and is the whitelist key used at WS
/// handshake time; it may contain `*` and must be percent-decoded from the
/// connection path before lookup (§6).
#[derive(Debug, Clone)]
pub struct ChargePoint {
    pub id: String,
    pub display_name: Option<String>,
    pub admin_state: AdminState,
    /// Per-CP current ceiling in amperes (default 16, §3).
    pub max_current_a: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_MAX_CURRENT_A: f64 = 16.0;

impl ChargePoint {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            display_name: None,
            admin_state: AdminState::Enabled,
            max_current_a: DEFAULT_MAX_CURRENT_A,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.admin_state == AdminState::Enabled
    }
}
