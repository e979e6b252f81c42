use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Catalog identifier of a product
pub type ProductId = i64;

/// Product entity as served by the catalog resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Product is no longer sold
    #[serde(default)]
    pub discontinued: bool,
    /// Price cannot be negotiated
    #[serde(default)]
    pub fixed_price: bool,
    /// Last modification, used for the catalog ordering
    #[serde(
        default,
        with = "timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub modified_date: Option<DateTime<Utc>>,
}

impl Product {
    /// Case-insensitive substring match on the name.
    ///
    /// `needle` must already be lowercase so a filter pass lowercases it once.
    pub fn name_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }

    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }
}

/// Payload for inserting a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub discontinued: bool,
    #[serde(default)]
    pub fixed_price: bool,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            description: None,
            image_url: None,
            discontinued: false,
            fixed_price: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The catalog emits either RFC 3339 timestamps or naive ones without an
/// offset; naive values are taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT).map(|dt| dt.and_utc()))
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_product_deserializes_camel_case() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "name": "Surface Pro",
            "price": 1299.5,
            "description": "Tablet",
            "imageUrl": "https://example.com/7.png",
            "discontinued": false,
            "fixedPrice": true,
            "modifiedDate": "2024-03-01T10:15:00Z"
        }))
        .unwrap();

        assert_eq!(product.id, 7);
        assert_eq!(product.image_url.as_deref(), Some("https://example.com/7.png"));
        assert!(product.fixed_price);
        assert_eq!(
            product.modified_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_product_accepts_naive_timestamp_and_missing_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Keyboard",
            "description": null,
            "modifiedDate": "2023-11-05T08:00:00.123"
        }))
        .unwrap();

        assert_eq!(product.price, 0.0);
        assert!(product.description.is_none());
        assert!(!product.discontinued);
        let modified = product.modified_date.unwrap();
        assert_eq!(modified.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_product_rejects_garbage_timestamp() {
        let result = serde_json::from_value::<Product>(json!({
            "id": 1,
            "name": "Keyboard",
            "modifiedDate": "yesterday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let product: Product =
            serde_json::from_value(json!({ "id": 1, "name": "Nokia Lumia" })).unwrap();

        assert!(product.name_contains("lumia"));
        assert!(product.name_contains(""));
        assert!(!product.name_contains("iphone"));
    }

    #[test]
    fn test_display_price() {
        let product: Product =
            serde_json::from_value(json!({ "id": 1, "name": "Mouse", "price": 19.9 })).unwrap();
        assert_eq!(product.display_price(), "19.90");
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("Desk lamp", 25.0).validate().is_ok());
        assert!(NewProduct::new("", 25.0).validate().is_err());
        assert!(NewProduct::new("Desk lamp", -1.0).validate().is_err());
    }

    #[test]
    fn test_new_product_serializes_camel_case() {
        let body = serde_json::to_value(
            NewProduct::new("Desk lamp", 25.0).with_description("Warm light"),
        )
        .unwrap();
        assert_eq!(body["name"], "Desk lamp");
        assert_eq!(body["fixedPrice"], false);
        assert_eq!(body["description"], "Warm light");
        assert!(body.get("id").is_none());
    }
}
