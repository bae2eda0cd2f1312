mod asset;
mod catalog;
mod client;
mod invoice;
mod lead;
mod message;
mod payment;
mod project;
mod settings;

pub use asset::{Asset, AssetKind};
pub use catalog::{AppPlan, LegalTemplate, Service, SplitParticipant, SplitSheet, SplitStatus};
pub use client::{Brand, Client, EventKind, TimelineEvent};
pub use invoice::{DocStatus, Invoice};
pub use lead::{LeadIntake, LeadPlatform, LeadStatus};
pub use message::{Message, Platform, Sender};
pub use payment::Payment;
pub use project::{ChecklistItem, PackageType, Project, ProjectStatus};
pub use settings::{SettingKey, StudioSettings};

/// A text column held a value outside the enumeration it maps to.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares an enumeration stored as its display text, both in Postgres text
/// columns and in JSON.
macro_rules! text_enum {
    ($(#[$meta:meta])* pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == s)
                    .ok_or_else(|| $crate::models::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use text_enum;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_enums_parse_their_display_strings() {
        for status in ProjectStatus::ALL {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), *status);
        }
        assert_eq!("On Hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert_eq!(AssetKind::VocalStems.to_string(), "Vocal Stems");
    }

    #[test]
    fn unknown_text_is_rejected() {
        let err = "Archived".parse::<ProjectStatus>().unwrap_err();
        assert_eq!(err.kind, "ProjectStatus");
        assert_eq!(err.value, "Archived");
    }

    #[test]
    fn text_enums_use_display_strings_in_json() {
        let json = serde_json::to_string(&DocStatus::Overdue).unwrap();
        assert_eq!(json, "\"Overdue\"");
        let sender: Sender = serde_json::from_str("\"operator\"").unwrap();
        assert_eq!(sender, Sender::Operator);
    }
}
