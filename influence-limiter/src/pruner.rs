//! Per-vertex influence pruning
//!
//! Given one vertex's [`WeightTable`] and a cap, [`PrunePlan::compute`]
//! decides which influences survive. The plan does not touch the host: it
//! yields [`PruneRequest`]s (zero these weights, then renormalize) that the
//! caller applies. Renormalization itself is the host deformer's job;
//! [`PrunePlan::preview`] only shows the proportional result the host is
//! expected to produce.
//!
//! # Examples
//!
//! ```rust
//! use influence_limiter::{MaxInfluences, PrunePlan, WeightTable};
//!
//! let table: WeightTable = [("A", 0.5), ("B", 0.3), ("C", 0.15), ("D", 0.05)]
//!     .into_iter()
//!     .collect();
//! let plan = PrunePlan::compute(&table, MaxInfluences::new(2)?);
//!
//! let pruned: Vec<_> = plan.pruned().iter().map(|w| w.influence.as_str()).collect();
//! assert_eq!(pruned, ["C", "D"]);
//!
//! let preview = plan.preview();
//! assert!((preview.weight_of("A") - 0.625).abs() < 1e-9);
//! # Ok::<(), influence_limiter::Error>(())
//! ```

use std::fmt;
use std::num::NonZeroU32;

use crate::{
    error::{Error, Result},
    host::InfluenceId,
    weights::{InfluenceWeight, WeightTable},
};

/// Maximum number of influences allowed on a vertex (at least 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaxInfluences(NonZeroU32);

impl MaxInfluences {
    /// The smallest cap, and the default
    pub const MIN: Self = Self(NonZeroU32::MIN);

    /// Validate a user-supplied cap
    pub fn new(value: i64) -> Result<Self> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "maximum influences must be between 1 and {}, got {value}",
                    u32::MAX
                ))
            })
    }

    /// The cap as a count
    pub fn get(self) -> usize {
        self.0.get() as usize
    }
}

impl Default for MaxInfluences {
    fn default() -> Self {
        Self::MIN
    }
}

impl TryFrom<i64> for MaxInfluences {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for MaxInfluences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutation the caller must apply to the vertex, in order
#[derive(Debug, Clone, PartialEq)]
pub enum PruneRequest {
    /// Overwrite an influence's weight
    SetWeight {
        /// The influence to change
        influence: InfluenceId,
        /// New weight (always 0.0 for pruning)
        weight: f64,
    },
    /// Rescale the remaining weights so they sum to 1.0
    Renormalize,
}

/// Which influences of one vertex are kept and which are pruned
#[derive(Debug, Clone, PartialEq)]
pub struct PrunePlan {
    kept: Vec<InfluenceWeight>,
    pruned: Vec<InfluenceWeight>,
}

impl PrunePlan {
    /// Decide which influences survive under `max`
    ///
    /// Tables already within the cap (the empty table included) are left
    /// untouched. Otherwise entries are stably sorted by descending weight:
    /// equal weights keep the order the host reported them in. Hosts that
    /// report influences in an unstable order therefore get an unspecified
    /// choice between equally weighted influences at the cut.
    pub fn compute(table: &WeightTable, max: MaxInfluences) -> Self {
        let cap = max.get();
        if table.len() <= cap {
            return Self {
                kept: table.entries().to_vec(),
                pruned: Vec::new(),
            };
        }

        let mut sorted = table.entries().to_vec();
        sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        let pruned = sorted.split_off(cap);
        Self {
            kept: sorted,
            pruned,
        }
    }

    /// Whether nothing needs to change on the vertex
    pub fn is_noop(&self) -> bool {
        self.pruned.is_empty()
    }

    /// Surviving influences, heaviest first when pruning occurs
    pub fn kept(&self) -> &[InfluenceWeight] {
        &self.kept
    }

    /// Influences to zero out, heaviest first
    pub fn pruned(&self) -> &[InfluenceWeight] {
        &self.pruned
    }

    /// The requests to apply: one zeroing per pruned influence, then one
    /// renormalization. Empty for a no-op plan.
    pub fn requests(&self) -> Vec<PruneRequest> {
        if self.is_noop() {
            return Vec::new();
        }
        self.pruned
            .iter()
            .map(|entry| PruneRequest::SetWeight {
                influence: entry.influence.clone(),
                weight: 0.0,
            })
            .chain(std::iter::once(PruneRequest::Renormalize))
            .collect()
    }

    /// Kept weights rescaled proportionally to sum to 1.0
    ///
    /// A no-op plan previews the original table unchanged.
    pub fn preview(&self) -> WeightTable {
        let total: f64 = self.kept.iter().map(|entry| entry.weight).sum();
        if self.is_noop() || total <= 0.0 {
            return self.kept.clone().into();
        }
        self.kept
            .iter()
            .map(|entry| InfluenceWeight::new(entry.influence.clone(), entry.weight / total))
            .collect()
    }
}

/// Validate `cap` and plan the pruning of `table`
///
/// Fails with [`Error::InvalidArgument`] when `cap < 1`.
pub fn plan_pruning(table: &WeightTable, cap: i64) -> Result<PrunePlan> {
    let max = MaxInfluences::new(cap)?;
    Ok(PrunePlan::compute(table, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn four_joints() -> WeightTable {
        [("A", 0.5), ("B", 0.3), ("C", 0.15), ("D", 0.05)]
            .into_iter()
            .collect()
    }

    fn names(entries: &[InfluenceWeight]) -> Vec<&str> {
        entries.iter().map(|entry| entry.influence.as_str()).collect()
    }

    #[test]
    fn test_cap_validation() {
        assert_eq!(MaxInfluences::new(1).unwrap().get(), 1);
        assert_eq!(MaxInfluences::default(), MaxInfluences::MIN);
        assert!(matches!(
            MaxInfluences::new(0),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            MaxInfluences::try_from(-3),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(MaxInfluences::new(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_within_cap_is_noop() {
        let table = four_joints();
        let plan = PrunePlan::compute(&table, MaxInfluences::new(4).unwrap());
        assert!(plan.is_noop());
        assert!(plan.requests().is_empty());
        assert_eq!(plan.preview(), table);
    }

    #[test]
    fn test_empty_table_is_noop() {
        let plan = plan_pruning(&WeightTable::new(), 1).unwrap();
        assert!(plan.is_noop());
        assert!(plan.kept().is_empty());
    }

    #[test]
    fn test_prunes_lightest_influences() {
        let plan = plan_pruning(&four_joints(), 2).unwrap();
        assert_eq!(names(plan.kept()), ["A", "B"]);
        assert_eq!(names(plan.pruned()), ["C", "D"]);

        let preview = plan.preview();
        assert_relative_eq!(preview.weight_of("A"), 0.625, epsilon = 1e-12);
        assert_relative_eq!(preview.weight_of("B"), 0.375, epsilon = 1e-12);
        assert_relative_eq!(preview.total_weight(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_requests_zero_then_renormalize() {
        let plan = plan_pruning(&four_joints(), 3).unwrap();
        assert_eq!(
            plan.requests(),
            vec![
                PruneRequest::SetWeight {
                    influence: InfluenceId::new("D"),
                    weight: 0.0,
                },
                PruneRequest::Renormalize,
            ]
        );
    }

    #[test]
    fn test_unsorted_input_is_ranked_by_weight() {
        let table: WeightTable = [("wrist", 0.1), ("elbow", 0.6), ("shoulder", 0.3)]
            .into_iter()
            .collect();
        let plan = plan_pruning(&table, 1).unwrap();
        assert_eq!(names(plan.kept()), ["elbow"]);
        assert_eq!(names(plan.pruned()), ["shoulder", "wrist"]);
        assert_relative_eq!(plan.preview().weight_of("elbow"), 1.0);
    }

    #[test]
    fn test_ties_keep_host_order() {
        let table: WeightTable = [
            ("first", 0.25),
            ("second", 0.25),
            ("third", 0.25),
            ("fourth", 0.25),
        ]
        .into_iter()
        .collect();
        let plan = plan_pruning(&table, 2).unwrap();
        assert_eq!(names(plan.kept()), ["first", "second"]);
        assert_eq!(names(plan.pruned()), ["third", "fourth"]);
    }

    #[test]
    fn test_invalid_cap_rejected() {
        assert!(matches!(
            plan_pruning(&four_joints(), 0),
            Err(Error::InvalidArgument { .. })
        ));
    }
}
