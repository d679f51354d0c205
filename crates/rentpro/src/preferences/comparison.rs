use serde::{Deserialize, Serialize};

/// Lower bound of Saaty's fundamental scale.
pub const SAATY_MIN: f64 = 1.0 / 9.0;
/// Upper bound of Saaty's fundamental scale.
pub const SAATY_MAX: f64 = 9.0;

pub fn clamp_saaty(value: f64) -> f64 {
    value.clamp(SAATY_MIN, SAATY_MAX)
}

pub fn is_within_saaty_scale(value: f64) -> bool {
    value.is_finite() && (SAATY_MIN..=SAATY_MAX).contains(&value)
}

/// Which side of a pair dominates the judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "A_OVER_B")]
    AOverB,
    #[serde(rename = "B_OVER_A")]
    BOverA,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::AOverB => Direction::BOverA,
            Direction::BOverA => Direction::AOverB,
        }
    }
}

/// A single slider judgment: an intensity on the 1–9 scale plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairJudgment {
    pub direction: Direction,
    pub intensity: f64,
}

impl PairJudgment {
    pub fn new(direction: Direction, intensity: f64) -> Self {
        Self {
            direction,
            intensity,
        }
    }

    pub fn equal() -> Self {
        Self::new(Direction::AOverB, 1.0)
    }

    pub fn favoring_a(intensity: f64) -> Self {
        Self::new(Direction::AOverB, intensity)
    }

    pub fn favoring_b(intensity: f64) -> Self {
        Self::new(Direction::BOverA, intensity)
    }

    /// True when the intensity is a usable point on the 1–9 scale.
    pub fn has_valid_intensity(&self) -> bool {
        self.intensity.is_finite() && (1.0..=9.0).contains(&self.intensity)
    }

    /// The same judgment seen from the other side of the pair.
    pub fn flipped(self) -> Self {
        Self::new(self.direction.flipped(), self.intensity)
    }

    /// Comparison value of `a` over `b`, always inside `[1/9, 9]`.
    pub fn value(&self) -> f64 {
        let intensity = clamp_saaty(self.intensity);
        match self.direction {
            Direction::AOverB => intensity,
            Direction::BOverA => clamp_saaty(1.0 / intensity),
        }
    }
}

impl Default for PairJudgment {
    fn default() -> Self {
        Self::equal()
    }
}

/// "How many times more important `criterion_a_key` is than `criterion_b_key`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub criterion_a_key: String,
    pub criterion_b_key: String,
    pub value: f64,
}

impl PairwiseComparison {
    pub fn new(a: impl Into<String>, b: impl Into<String>, value: f64) -> Self {
        Self {
            criterion_a_key: a.into(),
            criterion_b_key: b.into(),
            value,
        }
    }

    pub fn from_judgment(
        a: impl Into<String>,
        b: impl Into<String>,
        judgment: PairJudgment,
    ) -> Self {
        Self::new(a, b, judgment.value())
    }

    /// The implied reciprocal judgment of `b` over `a`.
    pub fn reversed(&self) -> Self {
        Self::new(
            self.criterion_b_key.clone(),
            self.criterion_a_key.clone(),
            clamp_saaty(1.0 / self.value),
        )
    }
}
