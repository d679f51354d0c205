use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::catalog::{property_type_value, CatalogError, Property, PropertyCatalog};
use super::topsis::{apply_price_boost, topsis_rank, TopsisError, MAX_PRICE_BOOST};
use crate::preferences::criteria::Criterion;
use crate::preferences::profile::{
    PreferenceProfileService, ProfileRepository, ProfileServiceError, UserId,
};
use crate::preferences::submission::round6;

pub const NO_PROPERTIES_MESSAGE: &str = "No available properties to recommend";

#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("preference profile not found; create it via PUT /api/v1/preference-profiles/me")]
    ProfileNotFound,
    #[error("pairwise comparisons not set; submit them via POST /api/v1/preference-profiles/me/pairwise-comparisons")]
    ComparisonsNotSet,
    #[error("comparisons are not consistent (cr {cr}, threshold {threshold})")]
    AhpInconsistent { cr: f64, threshold: f64 },
    #[error("no property type mapping for: {}", .0.join(", "))]
    UnknownPropertyTypes(Vec<String>),
    #[error("criterion {0} has no property attribute")]
    UnsupportedCriterion(String),
    #[error(transparent)]
    Profile(#[from] ProfileServiceError),
    #[error(transparent)]
    Topsis(#[from] TopsisError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AhpExplanation {
    pub weights: BTreeMap<String, f64>,
    pub cr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopsisExplanation {
    pub d_best: f64,
    pub d_worst: f64,
    /// Values fed into TOPSIS, keyed by criterion.
    pub criteria_values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub ahp: AhpExplanation,
    pub topsis: TopsisExplanation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationItem {
    pub property: Property,
    pub score: f64,
    pub explain: Explanation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationMeta {
    pub criteria_order: Vec<String>,
    pub is_benefit: Vec<bool>,
    pub cr_threshold: f64,
    pub available_properties_total: usize,
    pub ranked_properties_count: usize,
    pub missing_area_score_count: usize,
    pub price_boost: f64,
    pub effective_weights: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationsResponse {
    pub items: Vec<RecommendationItem>,
    pub meta: RecommendationMeta,
}

/// Ranks available properties for a renter using their stored AHP weights.
pub struct RecommendationService<R, C> {
    profiles: Arc<PreferenceProfileService<R>>,
    catalog: Arc<C>,
}

impl<R, C> RecommendationService<R, C>
where
    R: ProfileRepository + 'static,
    C: PropertyCatalog + 'static,
{
    pub fn new(profiles: Arc<PreferenceProfileService<R>>, catalog: Arc<C>) -> Self {
        Self { profiles, catalog }
    }

    pub fn recommend(
        &self,
        user: &UserId,
        price_boost: Option<f64>,
    ) -> Result<RecommendationsResponse, RecommendationError> {
        let profile = match self.profiles.get(user) {
            Ok(profile) => profile,
            Err(ProfileServiceError::NotFound) => return Err(RecommendationError::ProfileNotFound),
            Err(other) => return Err(other.into()),
        };
        if !profile.has_comparisons() {
            return Err(RecommendationError::ComparisonsNotSet);
        }

        let config = self.profiles.config();
        let ahp = self.profiles.assess(&profile)?;
        if !ahp.accepted {
            warn!(user = %user, cr = ahp.cr, "stored comparisons rejected as inconsistent");
            return Err(RecommendationError::AhpInconsistent {
                cr: round6(ahp.cr),
                threshold: config.cr_threshold,
            });
        }

        let order = self.profiles.order().keys().to_vec();
        let criteria = order
            .iter()
            .map(|key| {
                Criterion::from_key(key)
                    .ok_or_else(|| RecommendationError::UnsupportedCriterion(key.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let is_benefit: Vec<bool> = criteria
            .iter()
            .map(|criterion| criterion.is_benefit())
            .collect();

        let base_weights = ahp.weight_vector();
        let boost = price_boost
            .filter(|boost| boost.is_finite())
            .map_or(0.0, |boost| boost.clamp(0.0, MAX_PRICE_BOOST));
        let effective_weights = match price_boost {
            Some(boost) => apply_price_boost(&order, &base_weights, boost),
            None => base_weights,
        };

        let available = self.catalog.available()?;
        let mut meta = RecommendationMeta {
            criteria_order: order.clone(),
            is_benefit: is_benefit.clone(),
            cr_threshold: config.cr_threshold,
            available_properties_total: available.len(),
            ranked_properties_count: 0,
            missing_area_score_count: 0,
            price_boost: boost,
            effective_weights: effective_weights.clone(),
            message: None,
        };

        if available.is_empty() {
            meta.message = Some(NO_PROPERTIES_MESSAGE.to_string());
            return Ok(RecommendationsResponse {
                items: Vec::new(),
                meta,
            });
        }

        let mut unknown_types = BTreeSet::new();
        let mut ranked_properties = Vec::new();
        let mut matrix = Vec::new();

        for property in available {
            if property.area_score.is_none() {
                meta.missing_area_score_count += 1;
            }
            let Some(type_value) = property_type_value(&property.property_type) else {
                let label = property.property_type.trim();
                unknown_types.insert(if label.is_empty() {
                    "<empty>".to_string()
                } else {
                    label.to_ascii_uppercase()
                });
                continue;
            };

            matrix.push(
                criteria
                    .iter()
                    .map(|criterion| criterion_value(*criterion, &property, type_value))
                    .collect::<Vec<f64>>(),
            );
            ranked_properties.push(property);
        }

        if !unknown_types.is_empty() {
            if config.strict_property_types {
                return Err(RecommendationError::UnknownPropertyTypes(
                    unknown_types.into_iter().collect(),
                ));
            }
            warn!(types = ?unknown_types, "skipping properties with unmapped types");
        }

        let ranked = topsis_rank(&matrix, &effective_weights, &is_benefit)?;
        let ahp_explanation = AhpExplanation {
            weights: ahp
                .weights
                .iter()
                .map(|entry| (entry.key.clone(), entry.weight))
                .collect(),
            cr: ahp.cr,
        };

        let items: Vec<RecommendationItem> = ranked
            .into_iter()
            .map(|entry| RecommendationItem {
                property: ranked_properties[entry.index].clone(),
                score: entry.score,
                explain: Explanation {
                    ahp: ahp_explanation.clone(),
                    topsis: TopsisExplanation {
                        d_best: entry.d_best,
                        d_worst: entry.d_worst,
                        criteria_values: order
                            .iter()
                            .cloned()
                            .zip(matrix[entry.index].iter().copied())
                            .collect(),
                    },
                },
            })
            .collect();

        meta.ranked_properties_count = items.len();
        info!(
            user = %user,
            ranked = items.len(),
            cr = ahp.cr,
            price_boost = boost,
            "recommendations computed"
        );

        Ok(RecommendationsResponse { items, meta })
    }
}

fn criterion_value(criterion: Criterion, property: &Property, type_value: f64) -> f64 {
    match criterion {
        Criterion::Price => property.price,
        Criterion::Size => property.size,
        Criterion::PropertyType => type_value,
        Criterion::AreaScore => property.area_score.unwrap_or(0.0),
    }
}
