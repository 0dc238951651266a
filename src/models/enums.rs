use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for {field}: '{value}'")]
pub struct InvalidEnum {
    pub field: &'static str,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Variants are declared in ascending order, so the derived `Ord` follows
/// declaration order.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(RiskTier {
    Low => "low",
    Moderate => "moderate",
    High => "high",
    Emergency => "emergency",
});

str_enum!(Sex {
    Male => "male",
    Female => "female",
    Unknown => "unknown",
    Other => "other",
});

impl RiskTier {
    pub const ALL: [RiskTier; 4] = [
        RiskTier::Low,
        RiskTier::Moderate,
        RiskTier::High,
        RiskTier::Emergency,
    ];

    /// Parse a severity label from a remote model.
    ///
    /// The triage prompt offers `mild|moderate|severe|emergency`, so those
    /// labels are accepted alongside the canonical tier names.
    pub fn from_remote_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" | "mild" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" | "severe" => Some(Self::High),
            "emergency" | "critical" => Some(Self::Emergency),
            _ => None,
        }
    }
}

impl Sex {
    /// Lenient parse for request bodies: case-insensitive, anything
    /// unrecognized is `Other`, blank is `Unknown`.
    pub fn from_request(value: &str) -> Self {
        let v = value.trim().to_ascii_lowercase();
        if v.is_empty() {
            return Self::Unknown;
        }
        v.parse().unwrap_or(Self::Other)
    }
}
