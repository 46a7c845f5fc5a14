//! Community Settings DTOs (§6, §4.8).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::community_settings::CommunitySettings;

#[derive(Debug, Serialize)]
pub struct CommunitySettingsDto {
    pub enabled: bool,
    pub contract_kw: f64,
    pub voltage_v: f64,
    pub phases: i32,
    pub min_current_a: f64,
    pub max_current_a: f64,
}

impl From<CommunitySettings> for CommunitySettingsDto {
    fn from(s: CommunitySettings) -> Self {
        Self {
            enabled: s.enabled,
            contract_kw: s.contract_kw,
            voltage_v: s.voltage_v,
            phases: s.phases,
            min_current_a: s.min_current_a,
            max_current_a: s.max_current_a,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommunitySettingsRequest {
    pub enabled: bool,
    #[validate(range(min = 0.0, message = "contract_kw must be non-negative"))]
    pub contract_kw: f64,
    #[validate(range(min = 0.0, message = "voltage_v must be positive"))]
    pub voltage_v: f64,
    #[validate(range(min = 1, max = 3, message = "phases must be 1, 2, or 3"))]
    pub phases: i32,
    #[validate(range(min = 0.0, message = "min_current_a must be non-negative"))]
    pub min_current_a: f64,
    #[validate(range(min = 0.0, message = "max_current_a must be non-negative"))]
    pub max_current_a: f64,
}

impl From<UpdateCommunitySettingsRequest> for CommunitySettings {
    fn from(r: UpdateCommunitySettingsRequest) -> Self {
        Self {
            enabled: r.enabled,
            contract_kw: r.contract_kw,
            voltage_v: r.voltage_v,
            phases: r.phases,
            min_current_a: r.min_current_a,
            max_current_a: r.max_current_a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> UpdateCommunitySettingsRequest {
        UpdateCommunitySettingsRequest {
            enabled: true,
            contract_kw: 22.0,
            voltage_v: 230.0,
            phases: 3,
            min_current_a: 6.0,
            max_current_a: 32.0,
        }
    }

    #[test]
    fn valid_request_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn four_phases_fails_validation() {
        let mut req = valid_request();
        req.phases = 4;
        assert!(req.validate().is_err());
    }

    #[test]
    fn negative_contract_kw_fails_validation() {
        let mut req = valid_request();
        req.contract_kw = -1.0;
        assert!(req.validate().is_err());
    }
}
