use metrics_exporter_prometheus::PrometheusHandle;
use rentpro::config;
use rentpro::preferences::{
    Direction, PairJudgment, PreferenceProfile, ProfileRepository, RepositoryError, UserId,
};
use rentpro::recommendations::{CatalogError, Property, PropertyCatalog, PropertyStatus};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<UserId, PreferenceProfile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
    fn fetch(&self, user: &UserId) -> Result<Option<PreferenceProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(user).cloned())
    }

    fn save(&self, profile: PreferenceProfile) -> Result<PreferenceProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.user_id.clone(), profile.clone());
        Ok(profile)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyCatalog {
    properties: Arc<Mutex<Vec<Property>>>,
}

impl InMemoryPropertyCatalog {
    pub(crate) fn new(properties: Vec<Property>) -> Self {
        Self {
            properties: Arc::new(Mutex::new(properties)),
        }
    }

    pub(crate) fn seeded() -> Self {
        Self::new(seeded_properties())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.properties.lock().expect("catalog mutex poisoned").len()
    }
}

impl PropertyCatalog for InMemoryPropertyCatalog {
    fn available(&self) -> Result<Vec<Property>, CatalogError> {
        let guard = self.properties.lock().expect("catalog mutex poisoned");
        Ok(guard
            .iter()
            .filter(|property| property.is_available())
            .cloned()
            .collect())
    }
}

fn listing(
    id: u64,
    title: &str,
    property_type: &str,
    price: f64,
    size: f64,
    area: &str,
    area_score: f64,
) -> Property {
    Property {
        id,
        title: title.to_string(),
        property_type: property_type.to_string(),
        price,
        size,
        area: Some(area.to_string()),
        area_score: Some(area_score),
        status: PropertyStatus::Available,
    }
}

/// Sample listings used when no CSV export is supplied.
pub(crate) fn seeded_properties() -> Vec<Property> {
    let mut rented = listing(7, "Papagou penthouse", "APARTMENT", 1650.0, 115.0, "Papagou", 7.3);
    rented.status = PropertyStatus::Rented;

    vec![
        listing(1, "Kifisia garden apartment", "APARTMENT", 980.0, 78.0, "Kifisia", 8.1),
        listing(2, "Marousi studio", "STUDIO", 590.0, 34.0, "Marousi", 7.5),
        listing(3, "Chalandri maisonette", "MAISONETTE", 1350.0, 118.0, "Chalandri", 7.6),
        listing(4, "Agia Paraskevi flat", "APARTMENT", 760.0, 64.0, "Agia Paraskevi", 7.4),
        listing(5, "Athens loft", "STUDIO", 650.0, 42.0, "Athens", 7.2),
        listing(6, "Kifisia detached house", "DETACHED_HOUSE", 2200.0, 190.0, "Kifisia", 8.1),
        rented,
    ]
}

/// A `criterion_a:criterion_b:direction:intensity` judgment from the command line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JudgmentArg {
    pub(crate) criterion_a: String,
    pub(crate) criterion_b: String,
    pub(crate) judgment: PairJudgment,
}

pub(crate) fn parse_judgment(raw: &str) -> Result<JudgmentArg, String> {
    let parts: Vec<&str> = raw.trim().split(':').map(str::trim).collect();
    let [criterion_a, criterion_b, direction, intensity] = parts.as_slice() else {
        return Err(format!(
            "expected criterion_a:criterion_b:direction:intensity, got '{raw}'"
        ));
    };

    let direction = match direction.to_ascii_uppercase().as_str() {
        "A_OVER_B" => Direction::AOverB,
        "B_OVER_A" => Direction::BOverA,
        other => return Err(format!("direction must be A_OVER_B or B_OVER_A, got '{other}'")),
    };
    let intensity: f64 = intensity
        .parse()
        .map_err(|err| format!("failed to parse intensity '{intensity}' ({err})"))?;

    Ok(JudgmentArg {
        criterion_a: criterion_a.to_string(),
        criterion_b: criterion_b.to_string(),
        judgment: PairJudgment::new(direction, intensity),
    })
}

pub(crate) fn parse_threshold_arg(raw: &str) -> Result<f64, String> {
    config::parse_threshold(raw)
        .map_err(|_| format!("threshold must be a number in (0, 1], got '{raw}'"))
}
