use serde::{Deserialize, Serialize};

use crate::validate::{check_generation_range, ConfigError};

pub const MIN_DEGREE_STEPS: usize = 4;

pub const MAX_GENERATED_ANGLES: usize = 3601;

const SNAP: f64 = 1e9;
const EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct DegreeStepSet {
    steps: Vec<f64>,
}

/// Maps an angle onto the canonical half-range `(-180, 180]`, so that
/// equivalent headings compare equal. Sub-nanodegree noise from repeated
/// additions is snapped away.
pub fn canonical_degrees(degrees: f64) -> f64 {
    let mut value = degrees % 360.0;
    if value > 180.0 {
        value -= 360.0;
    } else if value <= -180.0 {
        value += 360.0;
    }
    value = (value * SNAP).round() / SNAP;
    if value <= -180.0 {
        value += 360.0;
    }
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl DegreeStepSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&mut self, from: f64, to: f64, step: f64) -> Result<(), ConfigError> {
        check_generation_range(from, to, step).into_result()?;

        let mut steps = Vec::new();
        let mut index = 0u32;
        loop {
            let value = from + step * f64::from(index);
            if value > to + EPSILON {
                break;
            }
            steps.push(canonical_degrees(value));
            steps.push(canonical_degrees(-value));
            index += 1;
        }
        self.steps = normalized(steps);
        Ok(())
    }

    pub fn from_text<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ConfigError> {
        let mut steps = Vec::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let value = parse_degrees(token).ok_or_else(|| ConfigError::DegreeStepToken {
                index,
                token: token.to_string(),
            })?;
            steps.push(canonical_degrees(value));
        }
        Ok(Self {
            steps: normalized(steps),
        })
    }

    pub fn to_text(&self) -> Vec<String> {
        self.steps.iter().map(|v| format_step(*v)).collect()
    }

    pub fn insert(&mut self, at: Option<usize>, value: f64) {
        match at {
            Some(index) if index < self.steps.len() => {
                self.steps.insert(index, canonical_degrees(value))
            }
            _ => self.steps.push(canonical_degrees(value)),
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<f64> {
        if index < self.steps.len() {
            Some(self.steps.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().copied()
    }

    pub fn contains(&self, degrees: f64) -> bool {
        let wanted = canonical_degrees(degrees);
        self.steps.iter().any(|v| (v - wanted).abs() < EPSILON)
    }

    pub fn is_symmetric(&self) -> bool {
        self.steps.iter().all(|v| self.contains(-v))
    }
}

impl From<Vec<f64>> for DegreeStepSet {
    fn from(values: Vec<f64>) -> Self {
        Self {
            steps: normalized(values.into_iter().map(canonical_degrees).collect()),
        }
    }
}

impl From<DegreeStepSet> for Vec<f64> {
    fn from(set: DegreeStepSet) -> Self {
        set.steps
    }
}

pub fn format_step(degrees: f64) -> String {
    format!("{degrees:.1}")
}

pub fn parse_degrees(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn normalized(mut steps: Vec<f64>) -> Vec<f64> {
    steps.sort_by(f64::total_cmp);
    steps.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
    steps
}
