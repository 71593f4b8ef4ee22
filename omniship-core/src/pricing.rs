use omniship_shared::{Parcel, ProviderKind, Rate};

/// Weight carried at the base price
pub const WEIGHT_ALLOWANCE_GRAMS: u32 = 5000;

/// Surcharge per started kilogram above the allowance, in minor units
pub const SURCHARGE_PER_KG_MINOR: i64 = 100;

/// Extra charge for parcels above the 5 kg allowance: 1.00 per started kilogram.
pub fn weight_surcharge(weight_grams: u32) -> i64 {
    if weight_grams <= WEIGHT_ALLOWANCE_GRAMS {
        return 0;
    }
    let started_kg = (weight_grams - WEIGHT_ALLOWANCE_GRAMS).div_ceil(1000);
    started_kg as i64 * SURCHARGE_PER_KG_MINOR
}

/// Insurance premium: 0.50 per started 100.00 of declared value.
///
/// Not applied to any quote today. Whether insurance belongs in the
/// shipping total is an open business decision.
pub fn insurance_fee(declared_value_minor: i64) -> i64 {
    if declared_value_minor <= 0 {
        return 0;
    }
    let started_hundreds = declared_value_minor / 10_000 + i64::from(declared_value_minor % 10_000 != 0);
    started_hundreds * 50
}

/// One row of a carrier's flat price list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLevel {
    pub method: &'static str,
    pub base_price_minor: i64,
    pub delivery_days: u32,
}

/// A carrier's flat price list in a single currency
#[derive(Debug, Clone, Copy)]
pub struct RateTable {
    provider: ProviderKind,
    currency: &'static str,
    levels: &'static [ServiceLevel],
}

impl RateTable {
    pub const fn new(provider: ProviderKind, currency: &'static str, levels: &'static [ServiceLevel]) -> Self {
        Self { provider, currency, levels }
    }

    pub fn currency(&self) -> &'static str {
        self.currency
    }

    pub fn levels(&self) -> &'static [ServiceLevel] {
        self.levels
    }

    pub fn find(&self, method: &str) -> Option<&'static ServiceLevel> {
        self.levels.iter().find(|level| level.method == method)
    }

    /// Price every level (or just `service_type`) for the parcel.
    /// An unknown `service_type` quotes nothing.
    pub fn quote(&self, parcel: &Parcel, service_type: Option<&str>) -> Vec<Rate> {
        let surcharge = weight_surcharge(parcel.weight());

        self.levels
            .iter()
            .filter(|level| service_type.map_or(true, |wanted| wanted == level.method))
            .map(|level| Rate {
                provider: self.provider,
                method: level.method.to_string(),
                price_minor: level.base_price_minor + surcharge,
                delivery_days: level.delivery_days,
                currency: self.currency.to_string(),
            })
            .collect()
    }
}
