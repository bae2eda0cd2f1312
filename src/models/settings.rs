use serde::{Deserialize, Serialize};

use super::text_enum;

text_enum! {
    pub enum SettingKey {
        AiEnabled => "Ai Enabled",
        AutoSync => "Auto Sync",
        Notifications => "Notifications",
        CloudBackup => "Cloud Backup",
        MarketingIntegration => "Marketing Integration",
    }
}

/// Operator-facing switches for the dashboard. Held in memory for the
/// session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioSettings {
    pub ai_enabled: bool,
    pub auto_sync: bool,
    pub notifications: bool,
    pub cloud_backup: bool,
    pub marketing_integration: bool,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            auto_sync: true,
            notifications: true,
            cloud_backup: false,
            marketing_integration: true,
        }
    }
}

impl StudioSettings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::AiEnabled => self.ai_enabled,
            SettingKey::AutoSync => self.auto_sync,
            SettingKey::Notifications => self.notifications,
            SettingKey::CloudBackup => self.cloud_backup,
            SettingKey::MarketingIntegration => self.marketing_integration,
        }
    }

    /// Flips one switch and returns its new value.
    pub fn toggle(&mut self, key: SettingKey) -> bool {
        let slot = match key {
            SettingKey::AiEnabled => &mut self.ai_enabled,
            SettingKey::AutoSync => &mut self.auto_sync,
            SettingKey::Notifications => &mut self.notifications,
            SettingKey::CloudBackup => &mut self.cloud_backup,
            SettingKey::MarketingIntegration => &mut self.marketing_integration,
        };
        *slot = !*slot;
        *slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_only_the_named_switch() {
        let mut settings = StudioSettings::default();
        assert!(!settings.toggle(SettingKey::AiEnabled));
        assert!(!settings.ai_enabled);
        assert!(settings.auto_sync);
        assert!(settings.toggle(SettingKey::CloudBackup));
        assert!(settings.get(SettingKey::CloudBackup));
    }
}
