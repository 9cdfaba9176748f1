use crate::ExtractError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar text fields filled through the extraction table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Brand,
    Description,
    ImageUrls,
    Type,
    Finition,
    Variure,
}

impl TextField {
    /// Every scalar text field, in output order
    pub const ALL: &'static [TextField] = &[
        Self::Title,
        Self::Brand,
        Self::Description,
        Self::ImageUrls,
        Self::Type,
        Self::Finition,
        Self::Variure,
    ];

    /// Field name as it appears in the serialized record
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Brand => "brand",
            Self::Description => "description",
            Self::ImageUrls => "image_urls",
            Self::Type => "type",
            Self::Finition => "finition",
            Self::Variure => "variure",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A product record filled from its page but still waiting for stock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialRecord {
    pub url: String,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub category: Vec<String>,
    pub image_urls: Option<String>,
    pub sku: Option<String>,
    pub product_type: Option<String>,
    pub finition: Option<String>,
    pub variure: Option<String>,
    pub details: BTreeMap<String, String>,
}

impl PartialRecord {
    /// Creates the empty shell for a recognised product page
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Sets a scalar text field
    pub fn set_text(&mut self, field: TextField, value: String) {
        let slot = match field {
            TextField::Title => &mut self.title,
            TextField::Brand => &mut self.brand,
            TextField::Description => &mut self.description,
            TextField::ImageUrls => &mut self.image_urls,
            TextField::Type => &mut self.product_type,
            TextField::Finition => &mut self.finition,
            TextField::Variure => &mut self.variure,
        };
        *slot = Some(value);
    }

    /// Reads a scalar text field
    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Title => self.title.as_deref(),
            TextField::Brand => self.brand.as_deref(),
            TextField::Description => self.description.as_deref(),
            TextField::ImageUrls => self.image_urls.as_deref(),
            TextField::Type => self.product_type.as_deref(),
            TextField::Finition => self.finition.as_deref(),
            TextField::Variure => self.variure.as_deref(),
        }
    }

    /// Attaches the stock message, producing the finished record
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::MissingSku` if the SKU was never resolved.
    pub fn finish(self, stock: String) -> Result<ProductRecord, ExtractError> {
        let sku = self.sku.ok_or(ExtractError::MissingSku)?;

        Ok(ProductRecord {
            url: self.url,
            title: self.title,
            brand: self.brand,
            description: self.description,
            category: self.category,
            image_urls: self.image_urls,
            sku,
            product_type: self.product_type,
            finition: self.finition,
            variure: self.variure,
            details: self.details,
            stock,
        })
    }
}

/// A complete product record, ready to be emitted
///
/// Field order here is the serialization order. Missing optional fields are
/// left out of the serialized form, as are an empty category and empty
/// details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<String>,

    pub sku: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variure: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,

    pub stock: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial() -> PartialRecord {
        let mut record = PartialRecord::new("https://www.afdb.fr/foo-SKU123.html");
        record.set_text(TextField::Title, "Widget".to_string());
        record.set_text(TextField::Brand, "Acme".to_string());
        record.set_text(TextField::Type, "Fraisée".to_string());
        record.category = vec!["Tools".to_string(), "Widgets".to_string()];
        record.sku = Some("SKU123".to_string());
        record
    }

    #[test]
    fn test_new_is_empty_shell() {
        let record = PartialRecord::new("https://www.afdb.fr/a-SKU1.html");
        assert_eq!(record.url, "https://www.afdb.fr/a-SKU1.html");
        for field in TextField::ALL {
            assert_eq!(record.text(*field), None);
        }
        assert!(record.sku.is_none());
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_set_text_round_trip() {
        let mut record = PartialRecord::new("u");
        for field in TextField::ALL {
            record.set_text(*field, field.name().to_uppercase());
        }
        for field in TextField::ALL {
            assert_eq!(record.text(*field), Some(field.name().to_uppercase().as_str()));
        }
    }

    #[test]
    fn test_finish_attaches_stock() {
        let record = partial().finish("2 units".to_string()).unwrap();
        assert_eq!(record.sku, "SKU123");
        assert_eq!(record.stock, "2 units");
        assert_eq!(record.category, vec!["Tools", "Widgets"]);
    }

    #[test]
    fn test_finish_without_sku_fails() {
        let record = PartialRecord::new("https://www.afdb.fr/foo-SKU1.html");
        assert!(matches!(
            record.finish("In Stock".to_string()),
            Err(ExtractError::MissingSku)
        ));
    }

    #[test]
    fn test_serialized_field_names() {
        let record = partial().finish("2 units".to_string()).unwrap();
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"url":"https://www.afdb.fr/foo-SKU123.html","title":"Widget","brand":"Acme","category":["Tools","Widgets"],"sku":"SKU123","type":"Fraisée","stock":"2 units"}"#
        );
    }

    #[test]
    fn test_deserialize_minimal() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"url":"u","sku":"S","stock":"ok"}"#).unwrap();
        assert_eq!(record.sku, "S");
        assert!(record.title.is_none());
        assert!(record.details.is_empty());
    }

    #[test]
    fn test_text_field_display() {
        assert_eq!(TextField::Type.to_string(), "type");
        assert_eq!(TextField::ImageUrls.to_string(), "image_urls");
    }
}
