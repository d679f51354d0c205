//! Property ranking: stored AHP weights fed into TOPSIS over the available catalog.

pub mod catalog;
pub mod router;
pub mod service;
pub mod topsis;

pub use catalog::{
    property_type_value, CatalogError, CatalogImportError, Property, PropertyCatalog,
    PropertyCsvImporter, PropertyStatus, PROPERTY_TYPE_MAPPING,
};
pub use router::recommendation_router;
pub use service::{
    Explanation, RecommendationError, RecommendationItem, RecommendationMeta,
    RecommendationService, RecommendationsResponse,
};
pub use topsis::{apply_price_boost, topsis_rank, TopsisError, TopsisScore, MAX_PRICE_BOOST};
