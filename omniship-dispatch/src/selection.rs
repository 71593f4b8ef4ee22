//! Static destination → carrier routing.
//!
//! A fixed country table, not a zone model: the same country code always
//! resolves to the same carrier.

use omniship_shared::{Address, ProviderKind, ProviderRole};

/// Warehouse home country, in both ISO alpha-2 and alpha-3 form
const HOME_COUNTRIES: &[&str] = &["PL", "POL"];

/// EU countries served by the regional courier
const REGIONAL_COUNTRIES: &[&str] = &[
    "DE", "FR", "IT", "ES", "NL", "BE", "AT", "CZ", "SK", "HU", "RO", "BG",
];

pub fn role_for_country(country: &str) -> ProviderRole {
    let code = country.trim().to_ascii_uppercase();
    if HOME_COUNTRIES.contains(&code.as_str()) {
        ProviderRole::Local
    } else if REGIONAL_COUNTRIES.contains(&code.as_str()) {
        ProviderRole::Regional
    } else {
        ProviderRole::Global
    }
}

/// Carrier for a destination. The shipping method does not affect routing.
pub fn select_provider(destination: &Address, _shipping_method: Option<&str>) -> ProviderKind {
    ProviderKind::for_role(role_for_country(&destination.country))
}
