//! Settings lookup by `[section] key`.

use crate::domain::error::DashboardError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// Trimmed value; a blank entry counts as unset.
    fn get_setting(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn require_setting(&self, section: &str, key: &str) -> Result<String, DashboardError> {
        self.get_setting(section, key)
            .ok_or_else(|| DashboardError::ConfigMissing {
                section: section.into(),
                key: key.into(),
            })
    }
}
