//! CommunitySettings singleton (§3): Smart Charging configuration.

#[derive(Debug, Clone)]
pub struct CommunitySettings {
    pub enabled: bool,
    pub contract_kw: f64,
    pub voltage_v: f64,
    pub phases: i32,
    pub min_current_a: f64,
    pub max_current_a: f64,
}

impl Default for CommunitySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            contract_kw: 0.0,
            voltage_v: 220.0,
            phases: 1,
            min_current_a: 6.0,
            max_current_a: 32.0,
        }
    }
}
