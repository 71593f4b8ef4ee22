use crate::models::ProviderKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A priced shipping option returned by a quote call.
///
/// Prices are in minor currency units (grosze, cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub provider: ProviderKind,
    pub method: String,
    pub price_minor: i64,
    pub delivery_days: u32,
    pub currency: String,
}

impl Rate {
    pub fn id(&self) -> RateId {
        RateId {
            provider: self.provider,
            method: self.method.clone(),
        }
    }

    /// Price in major units, for display only
    pub fn price(&self) -> f64 {
        self.price_minor as f64 / 100.0
    }
}

/// Checkout option identifier, `{provider}_{method}` (e.g. `inpost_courier`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateId {
    pub provider: ProviderKind,
    pub method: String,
}

impl RateId {
    pub fn new(provider: ProviderKind, method: impl Into<String>) -> Self {
        Self {
            provider,
            method: method.into(),
        }
    }

    pub fn matches(&self, rate: &Rate) -> bool {
        rate.provider == self.provider && rate.method == self.method
    }

    /// Keep only the rates for this option
    pub fn filter(&self, rates: Vec<Rate>) -> Vec<Rate> {
        rates.into_iter().filter(|r| self.matches(r)).collect()
    }
}

impl fmt::Display for RateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.provider, self.method)
    }
}

impl FromStr for RateId {
    type Err = crate::models::UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find_map(|provider| {
                s.strip_prefix(provider.as_str())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .filter(|method| !method.is_empty())
                    .map(|method| RateId::new(provider, method))
            })
            .ok_or_else(|| crate::models::UnknownProvider(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(provider: ProviderKind, method: &str) -> Rate {
        Rate {
            provider,
            method: method.to_string(),
            price_minor: 1399,
            delivery_days: 2,
            currency: "PLN".to_string(),
        }
    }

    #[test]
    fn test_option_id_keeps_underscored_methods() {
        let id: RateId = "inpost_paczkomat_24_7".parse().unwrap();
        assert_eq!(id.provider, ProviderKind::InPost);
        assert_eq!(id.method, "paczkomat_24_7");
        assert_eq!(id.to_string(), "inpost_paczkomat_24_7");
    }

    #[test]
    fn test_option_id_rejects_unknown() {
        assert!("ups_ground".parse::<RateId>().is_err());
        assert!("dhl_".parse::<RateId>().is_err());
        assert!("dhl".parse::<RateId>().is_err());
    }

    #[test]
    fn test_filter_by_option() {
        let rates = vec![
            rate(ProviderKind::InPost, "courier"),
            rate(ProviderKind::Dhl, "courier"),
            rate(ProviderKind::InPost, "parcel_locker"),
        ];
        let kept = RateId::new(ProviderKind::InPost, "courier").filter(rates);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id().to_string(), "inpost_courier");
        assert_eq!(kept[0].price(), 13.99);
    }
}
