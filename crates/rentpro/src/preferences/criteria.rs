use std::fmt;

use serde::{Deserialize, Serialize};

/// Decision criteria used by the rental recommendation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Price,
    Size,
    PropertyType,
    AreaScore,
}

impl Criterion {
    /// Canonical order; defines matrix rows/columns and weight positions.
    pub const ORDER: [Criterion; 4] = [
        Criterion::Price,
        Criterion::Size,
        Criterion::PropertyType,
        Criterion::AreaScore,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Criterion::Price => "price",
            Criterion::Size => "size",
            Criterion::PropertyType => "property_type",
            Criterion::AreaScore => "area_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Price => "Price (€/month)",
            Criterion::Size => "Size (sqm)",
            Criterion::PropertyType => "Property type (ordinal)",
            Criterion::AreaScore => "Area score",
        }
    }

    /// Benefit criteria prefer higher values; price is the only cost criterion.
    pub fn is_benefit(self) -> bool {
        !matches!(self, Criterion::Price)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ORDER
            .into_iter()
            .find(|criterion| criterion.key() == key)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Ordered, duplicate-free list of criterion keys.
///
/// Position in the list is the row/column index of the comparison matrix and the
/// index of the matching priority weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CriteriaOrder {
    keys: Vec<String>,
}

impl CriteriaOrder {
    /// The fixed RentPro criteria: price, size, property_type, area_score.
    pub fn standard() -> Self {
        Self {
            keys: Criterion::ORDER
                .iter()
                .map(|criterion| criterion.key().to_string())
                .collect(),
        }
    }

    pub fn new<I, S>(keys: I) -> Result<Self, CriteriaOrderError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if key.trim().is_empty() {
                return Err(CriteriaOrderError::EmptyKey);
            }
            if collected.contains(&key) {
                return Err(CriteriaOrderError::Duplicate(key));
            }
            collected.push(key);
        }
        Ok(Self { keys: collected })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.keys.iter().position(|candidate| candidate == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// Every unordered pair `(keys[i], keys[j])` with `i < j`, row-major.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::with_capacity(self.pair_count());
        for (i, a) in self.keys.iter().enumerate() {
            for b in &self.keys[i + 1..] {
                pairs.push((a.as_str(), b.as_str()));
            }
        }
        pairs
    }

    /// `n·(n−1)/2`, the size of a complete judgment set.
    pub fn pair_count(&self) -> usize {
        let n = self.keys.len();
        n * n.saturating_sub(1) / 2
    }
}

impl Default for CriteriaOrder {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaOrderError {
    #[error("criterion key must not be empty")]
    EmptyKey,
    #[error("duplicate criterion key '{0}'")]
    Duplicate(String),
}
