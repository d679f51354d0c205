use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

/// Ordinal value of each supported property type, used as a benefit criterion.
pub const PROPERTY_TYPE_MAPPING: [(&str, f64); 4] = [
    ("STUDIO", 1.0),
    ("APARTMENT", 2.0),
    ("MAISONETTE", 3.0),
    ("DETACHED_HOUSE", 4.0),
];

/// Numeric value for a raw property type, matched case-insensitively.
pub fn property_type_value(raw: &str) -> Option<f64> {
    let normalized = raw.trim().to_ascii_uppercase();
    PROPERTY_TYPE_MAPPING
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, value)| *value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    #[default]
    Available,
    Rented,
    Inactive,
}

/// A listed rental property as seen by the recommendation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,
    pub title: String,
    /// Raw type label, e.g. `APARTMENT`; see [`property_type_value`].
    pub property_type: String,
    /// Monthly rent.
    pub price: f64,
    /// Floor area in square meters.
    pub size: f64,
    pub area: Option<String>,
    pub area_score: Option<f64>,
    pub status: PropertyStatus,
}

impl Property {
    pub fn is_available(&self) -> bool {
        self.status == PropertyStatus::Available
    }
}

/// Source of listed properties.
pub trait PropertyCatalog: Send + Sync {
    /// Properties currently open for rent.
    fn available(&self) -> Result<Vec<Property>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("property catalog unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read property export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid property CSV data: {}", err),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads properties from a CSV export with the header
/// `id,title,property_type,price,size,area,area_score,status`.
///
/// `area`, `area_score` and `status` may be empty; a missing status means available.
pub struct PropertyCsvImporter;

impl PropertyCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Property>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Property>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut properties = Vec::new();
        for record in csv_reader.deserialize::<PropertyRow>() {
            properties.push(record?.into_property());
        }
        Ok(properties)
    }
}

#[derive(Debug, Deserialize)]
struct PropertyRow {
    id: u64,
    title: String,
    property_type: String,
    price: f64,
    size: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    area: Option<String>,
    #[serde(default)]
    area_score: Option<f64>,
    #[serde(default)]
    status: Option<PropertyStatus>,
}

impl PropertyRow {
    fn into_property(self) -> Property {
        Property {
            id: self.id,
            title: self.title,
            property_type: self.property_type,
            price: self.price,
            size: self.size,
            area: self.area,
            area_score: self.area_score,
            status: self.status.unwrap_or_default(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
