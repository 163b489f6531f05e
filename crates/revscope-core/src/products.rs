use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Placeholder for a product text field whose node was missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a product title that could not be found.
pub const UNKNOWN_NAME: &str = "unknown";

/// Structured data pulled from a single product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    pub rating: RatingInfo,
    pub price: PriceInfo,
    pub bank_offers: Vec<String>,
    pub features: Vec<String>,
    pub specifications: Specifications,
    /// Gallery image URLs, video thumbnails excluded.
    pub images: Vec<String>,
    /// Images from the manufacturer's description section.
    #[serde(default)]
    pub manufacturer_images: Vec<String>,
    /// Generated overview. Empty until the summary step has run.
    #[serde(default, alias = "aiReviewSummary")]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingInfo {
    /// Display text such as `"4.3 out of 5 stars"`, or `"N/A"`.
    pub display: String,
    /// Numeric star value parsed from `display`.
    pub stars: Option<f64>,
    /// Ratings-count text such as `"12,345 ratings"`, or `"N/A"`.
    pub count: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub selling: String,
    pub discount: Option<String>,
}

/// Attribute rows from the product details tables, in page order.
///
/// Serialized as a JSON object whose keys keep that order. Keys are unique:
/// [`Specifications::insert`] ignores a key that is already present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Specifications(IndexMap<String, String>);

impl Specifications {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row unless `key` was already recorded. Returns whether the
    /// row was kept.
    pub fn insert(&mut self, key: String, value: String) -> bool {
        match self.0.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Specifications {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut specs = Self::new();
        for (key, value) in iter {
            specs.insert(key, value);
        }
        specs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ProductRecord {
        ProductRecord {
            name: "Heavy Duty Gloves".to_string(),
            rating: RatingInfo {
                display: "4.3 out of 5 stars".to_string(),
                stars: Some(4.3),
                count: "1,024 ratings".to_string(),
            },
            price: PriceInfo {
                selling: "149".to_string(),
                discount: Some("-25%".to_string()),
            },
            bank_offers: vec![],
            features: vec!["Reusable".to_string()],
            specifications: [
                ("Material".to_string(), "Rubber".to_string()),
                ("Colour".to_string(), "Blue".to_string()),
                ("Brand".to_string(), "Scotch-Brite".to_string()),
            ]
            .into_iter()
            .collect(),
            images: vec!["https://img.example.com/1.jpg".to_string()],
            manufacturer_images: vec!["https://img.example.com/m1.jpg".to_string()],
            summary: String::new(),
        }
    }

    #[test]
    fn specifications_keep_first_value_for_duplicate_key() {
        let mut specs = Specifications::new();
        assert!(specs.insert("Colour".to_string(), "Blue".to_string()));
        assert!(!specs.insert("Colour".to_string(), "Red".to_string()));
        assert_eq!(specs.get("Colour"), Some("Blue"));
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn specifications_serialize_in_page_order() {
        let json = serde_json::to_string(&sample_record().specifications).expect("serialize");
        assert_eq!(
            json,
            r#"{"Material":"Rubber","Colour":"Blue","Brand":"Scotch-Brite"}"#
        );
    }

    #[test]
    fn product_record_uses_camel_case_keys() {
        let json = serde_json::to_value(sample_record()).expect("serialize");
        assert!(json.get("bankOffers").is_some());
        assert_eq!(json["rating"]["stars"], 4.3);
        assert_eq!(json["price"]["selling"], "149");
        assert_eq!(json["summary"], "");
        assert_eq!(json["manufacturerImages"][0], "https://img.example.com/m1.jpg");
    }

    #[test]
    fn product_record_round_trips_through_json() {
        let record = sample_record();
        let json = serde_json::to_string(&record).expect("serialize");
        let back: ProductRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
        let keys: Vec<&str> = back.specifications.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Material", "Colour", "Brand"]);
    }

    #[test]
    fn product_record_reads_legacy_summary_name() {
        let mut legacy = serde_json::to_value(sample_record()).expect("serialize");
        let object = legacy.as_object_mut().expect("record is an object");
        object.remove("summary");
        object.remove("manufacturerImages");
        object.insert("aiReviewSummary".to_string(), "Sturdy gloves.".into());

        let record: ProductRecord = serde_json::from_value(legacy).expect("deserialize");
        assert_eq!(record.summary, "Sturdy gloves.");
        assert!(record.manufacturer_images.is_empty());
    }

    #[test]
    fn specifications_from_iter_keeps_first_duplicate_in_place() {
        let specs: Specifications = [
            ("Colour", "Blue"),
            ("Size", "M"),
            ("Colour", "Green"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let rows: Vec<(&str, &str)> = specs.iter().collect();
        assert_eq!(rows, vec![("Colour", "Blue"), ("Size", "M")]);
    }
}
