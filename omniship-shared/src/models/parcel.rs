use serde::{Deserialize, Serialize};

const DEFAULT_ITEM_WEIGHT_GRAMS: u32 = 500;
const DEFAULT_ITEM_LENGTH_CM: f64 = 30.0;
const DEFAULT_ITEM_WIDTH_CM: f64 = 20.0;
const DEFAULT_ITEM_HEIGHT_CM: f64 = 5.0;

/// Physical package: dimensions in centimetres, weight in grams.
///
/// Fields are private so a `Parcel` can only exist with a positive weight and
/// positive dimensions, including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParcel")]
pub struct Parcel {
    length: f64,
    width: f64,
    height: f64,
    weight: u32,
}

#[derive(Deserialize)]
struct RawParcel {
    length: f64,
    width: f64,
    height: f64,
    weight: u32,
}

impl TryFrom<RawParcel> for Parcel {
    type Error = ParcelError;

    fn try_from(raw: RawParcel) -> Result<Self, Self::Error> {
        Parcel::new(raw.length, raw.width, raw.height, raw.weight)
    }
}

/// One line of a cart, used to estimate the box it ships in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParcelItem {
    pub weight: Option<u32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParcelError {
    #[error("Parcel weight must be greater than zero")]
    ZeroWeight,

    #[error("Parcel dimension {0} must be a positive number")]
    InvalidDimension(&'static str),

    #[error("Cannot build a parcel from an empty item list")]
    NoItems,
}

impl Parcel {
    pub fn new(length: f64, width: f64, height: f64, weight: u32) -> Result<Self, ParcelError> {
        if weight == 0 {
            return Err(ParcelError::ZeroWeight);
        }
        for (name, value) in [("length", length), ("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParcelError::InvalidDimension(name));
            }
        }

        Ok(Self { length, width, height, weight })
    }

    /// Estimate a single box for a set of cart items.
    ///
    /// Items are stacked: weight and height add up per unit, length and width
    /// take the largest item. Missing measurements fall back to a 500 g,
    /// 30x20x5 cm item.
    pub fn consolidate(items: &[ParcelItem]) -> Result<Self, ParcelError> {
        if items.is_empty() {
            return Err(ParcelError::NoItems);
        }

        let mut weight: u32 = 0;
        let mut length: f64 = 0.0;
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;

        for item in items {
            let quantity = item.quantity.unwrap_or(1);
            weight = weight.saturating_add(
                item.weight.unwrap_or(DEFAULT_ITEM_WEIGHT_GRAMS).saturating_mul(quantity),
            );
            length = length.max(item.length.unwrap_or(DEFAULT_ITEM_LENGTH_CM));
            width = width.max(item.width.unwrap_or(DEFAULT_ITEM_WIDTH_CM));
            height += item.height.unwrap_or(DEFAULT_ITEM_HEIGHT_CM) * quantity as f64;
        }

        Parcel::new(length, width, height, weight)
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Weight in grams
    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_weight() {
        assert_eq!(Parcel::new(30.0, 20.0, 10.0, 0), Err(ParcelError::ZeroWeight));
        assert_eq!(
            Parcel::new(30.0, -1.0, 10.0, 100),
            Err(ParcelError::InvalidDimension("width"))
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Parcel =
            serde_json::from_str(r#"{"length":30,"width":20,"height":10,"weight":1000}"#).unwrap();
        assert_eq!(ok.weight_kg(), 1.0);

        let bad = serde_json::from_str::<Parcel>(r#"{"length":30,"width":20,"height":10,"weight":0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_consolidate_stacks_items() {
        let items = vec![
            ParcelItem {
                weight: Some(1200),
                length: Some(40.0),
                width: Some(10.0),
                height: Some(4.0),
                quantity: Some(2),
            },
            ParcelItem::default(),
        ];

        let parcel = Parcel::consolidate(&items).unwrap();
        assert_eq!(parcel.weight(), 2 * 1200 + 500);
        assert_eq!(parcel.length(), 40.0);
        assert_eq!(parcel.width(), 20.0);
        assert_eq!(parcel.height(), 2.0 * 4.0 + 5.0);
    }

    #[test]
    fn test_consolidate_empty() {
        assert_eq!(Parcel::consolidate(&[]), Err(ParcelError::NoItems));
    }
}
