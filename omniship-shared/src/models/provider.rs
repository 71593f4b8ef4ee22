use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of carriers the platform integrates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    InPost,
    Dpd,
    Dhl,
}

/// Routing role a carrier plays in provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    /// Home-country courier
    Local,
    /// Same-region (EU) courier
    Regional,
    /// Everything else
    Global,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [ProviderKind::InPost, ProviderKind::Dpd, ProviderKind::Dhl];

    /// Wire key used in rates, option ids and persisted shipment rows
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::InPost => "inpost",
            ProviderKind::Dpd => "dpd",
            ProviderKind::Dhl => "dhl",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::InPost => "InPost",
            ProviderKind::Dpd => "DPD",
            ProviderKind::Dhl => "DHL",
        }
    }

    pub fn role(&self) -> ProviderRole {
        match self {
            ProviderKind::InPost => ProviderRole::Local,
            ProviderKind::Dpd => ProviderRole::Regional,
            ProviderKind::Dhl => ProviderRole::Global,
        }
    }

    pub fn for_role(role: ProviderRole) -> ProviderKind {
        match role {
            ProviderRole::Local => ProviderKind::InPost,
            ProviderRole::Regional => ProviderKind::Dpd,
            ProviderRole::Global => ProviderKind::Dhl,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown shipping provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}
