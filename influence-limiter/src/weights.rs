//! Per-vertex influence weights
//!
//! A vertex of a skinned mesh is deformed by several joints, each with a
//! weight. The host keeps those weights summing to 1.0; [`WeightTable`] is a
//! read-only snapshot of one vertex's table in host order.

use crate::host::InfluenceId;

/// A joint's contribution to one vertex
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceWeight {
    /// The joint
    pub influence: InfluenceId,
    /// The weight value (typically 0.0 to 1.0)
    pub weight: f64,
}

impl InfluenceWeight {
    /// Create a new influence weight
    pub fn new<I: Into<InfluenceId>>(influence: I, weight: f64) -> Self {
        Self {
            influence: influence.into(),
            weight,
        }
    }
}

impl From<(InfluenceId, f64)> for InfluenceWeight {
    fn from((influence, weight): (InfluenceId, f64)) -> Self {
        Self { influence, weight }
    }
}

impl<'a> From<(&'a str, f64)> for InfluenceWeight {
    fn from((influence, weight): (&'a str, f64)) -> Self {
        Self::new(influence, weight)
    }
}

/// The ordered influence weights of one vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    entries: Vec<InfluenceWeight>,
}

impl WeightTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of influences
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the vertex has no influences at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in host order
    pub fn entries(&self) -> &[InfluenceWeight] {
        &self.entries
    }

    /// Iterate entries in host order
    pub fn iter(&self) -> impl Iterator<Item = &InfluenceWeight> + '_ {
        self.entries.iter()
    }

    /// Weight of one influence (0.0 if it does not affect the vertex)
    pub fn weight_of(&self, influence: &str) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.influence.as_str() == influence)
            .map(|entry| entry.weight)
            .unwrap_or(0.0)
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    /// The largest weight, 0.0 for an empty table
    pub fn max_weight(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.weight)
            .fold(0.0, f64::max)
    }

    /// Whether the weights sum to 1.0 within `tolerance`
    ///
    /// An empty table is never considered normalized.
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        !self.is_empty() && (self.total_weight() - 1.0).abs() <= tolerance
    }
}

impl<W: Into<InfluenceWeight>> FromIterator<W> for WeightTable {
    fn from_iter<T: IntoIterator<Item = W>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<InfluenceWeight>> for WeightTable {
    fn from(entries: Vec<InfluenceWeight>) -> Self {
        Self { entries }
    }
}

impl From<WeightTable> for Vec<InfluenceWeight> {
    fn from(table: WeightTable) -> Self {
        table.entries
    }
}

impl<'a> IntoIterator for &'a WeightTable {
    type Item = &'a InfluenceWeight;
    type IntoIter = std::slice::Iter<'a, InfluenceWeight>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
