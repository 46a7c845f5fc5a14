//! IdTag domain entity (§3): the authorization record keyed by idTag value.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Accepted,
    Blocked,
    Expired,
    Invalid,
}

impl AuthorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Blocked => "Blocked",
            Self::Expired => "Expired",
            Self::Invalid => "Invalid",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Accepted" => Self::Accepted,
            "Blocked" => Self::Blocked,
            "Expired" => Self::Expired,
            _ => Self::Invalid,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IdTag {
    pub id_tag: String,
    pub status: AuthorizationStatus,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdTag {
    pub fn new(id_tag: impl Into<String>, status: AuthorizationStatus) -> Self {
        let now = Utc::now();
        Self {
            id_tag: id_tag.into(),
            status,
            expiry_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Resolves the effective status at `now`, folding in expiry (§3, §7).
    pub fn effective_status(&self, now: DateTime<Utc>) -> AuthorizationStatus {
        if self.status != AuthorizationStatus::Accepted {
            return self.status;
        }
        match self.expiry_date {
            Some(expiry) if expiry <= now => AuthorizationStatus::Expired,
            _ => AuthorizationStatus::Accepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn accepted_with_no_expiry_stays_accepted() {
        let tag = IdTag::new("T1", AuthorizationStatus::Accepted);
        assert_eq!(tag.effective_status(Utc::now()), AuthorizationStatus::Accepted);
    }

    #[test]
    fn accepted_past_expiry_becomes_expired() {
        let mut tag = IdTag::new("T1", AuthorizationStatus::Accepted);
        tag.expiry_date = Some(Utc::now() - Duration::hours(1));
        assert_eq!(tag.effective_status(Utc::now()), AuthorizationStatus::Expired);
    }

    #[test]
    fn blocked_stays_blocked_regardless_of_expiry() {
        let tag = IdTag::new("T1", AuthorizationStatus::Blocked);
        assert_eq!(tag.effective_status(Utc::now()), AuthorizationStatus::Blocked);
    }
}
