use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{CaseError, Result};

/// Rarity tier of an item. Declaration order is the order of the
/// cumulative buckets walked by [`RarityTable::sample`].
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    ExceedinglyRare,
    Covert,
    Classified,
    Restricted,
    MilSpec,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::ExceedinglyRare,
        Rarity::Covert,
        Rarity::Classified,
        Rarity::Restricted,
        Rarity::MilSpec,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::ExceedinglyRare => 0,
            Self::Covert => 1,
            Self::Classified => 2,
            Self::Restricted => 3,
            Self::MilSpec => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ExceedinglyRare => "ExceedinglyRare",
            Self::Covert => "Covert",
            Self::Classified => "Classified",
            Self::Restricted => "Restricted",
            Self::MilSpec => "MilSpec",
        }
    }

    /// Display color as `#rrggbb`.
    pub fn color(self) -> &'static str {
        match self {
            Self::ExceedinglyRare => "#ff4500",
            Self::Covert => "#d32f2f",
            Self::Classified => "#9c27b0",
            Self::Restricted => "#1976d2",
            Self::MilSpec => "#757575",
        }
    }

    pub fn color_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::ExceedinglyRare => (0xff, 0x45, 0x00),
            Self::Covert => (0xd3, 0x2f, 0x2f),
            Self::Classified => (0x9c, 0x27, 0xb0),
            Self::Restricted => (0x19, 0x76, 0xd2),
            Self::MilSpec => (0x75, 0x75, 0x75),
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Drop rates in percent, in bucket order.
pub const DROP_RATES: &[(Rarity, f64)] = &[
    (Rarity::ExceedinglyRare, 0.26),
    (Rarity::Covert, 0.64),
    (Rarity::Classified, 3.2),
    (Rarity::Restricted, 15.98),
    (Rarity::MilSpec, 79.92),
];

/// How far a table total may drift from 100 and still count as complete.
pub const SUM_TOLERANCE: f64 = 0.01;

/// Ordered `(rarity, weight)` pairs. Weights are percentages out of 100
/// and are walked cumulatively in the order given.
#[derive(Clone, Debug, PartialEq)]
pub struct RarityTable {
    entries: Vec<(Rarity, f64)>,
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            entries: DROP_RATES.to_vec(),
        }
    }
}

impl RarityTable {
    pub fn new(entries: Vec<(Rarity, f64)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(CaseError::InvalidRarityTable(
                "table has no entries".to_string(),
            ));
        }

        for (i, (rarity, weight)) in entries.iter().enumerate() {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(CaseError::InvalidRarityTable(format!(
                    "weight for {rarity} must be positive, got {weight}"
                )));
            }
            if entries[..i].iter().any(|(seen, _)| seen == rarity) {
                return Err(CaseError::InvalidRarityTable(format!(
                    "{rarity} appears more than once"
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(Rarity, f64)] {
        &self.entries
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, weight)| weight).sum()
    }

    pub fn is_complete(&self) -> bool {
        (self.total() - 100.0).abs() <= SUM_TOLERANCE
    }

    /// Weight configured for `rarity`, or zero when the table omits it.
    pub fn weight_of(&self, rarity: Rarity) -> f64 {
        self.entries
            .iter()
            .find(|(r, _)| *r == rarity)
            .map(|(_, weight)| *weight)
            .unwrap_or(0.0)
    }

    /// Roll a uniform value in `[0, 100)` and map it to a bucket.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Rarity> {
        let roll = rng.gen_range(0.0..100.0);
        self.bucket_for(roll)
    }

    /// Returns the first rarity whose cumulative weight reaches `roll`.
    pub fn bucket_for(&self, roll: f64) -> Result<Rarity> {
        let mut cumulative = 0.0;
        for (rarity, weight) in &self.entries {
            cumulative += weight;
            if roll <= cumulative {
                return Ok(*rarity);
            }
        }

        // Float accumulation can leave the total a hair under 100.
        if self.is_complete() && roll < 100.0 {
            if let Some((last, _)) = self.entries.last() {
                return Ok(*last);
            }
        }

        Err(CaseError::NoRarityMatched { roll })
    }
}

/// Per-rarity tally, zero for every tier until incremented.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RarityCounts {
    counts: [u64; 5],
}

impl RarityCounts {
    pub fn get(&self, rarity: Rarity) -> u64 {
        self.counts[rarity.index()]
    }

    pub fn increment(&mut self, rarity: Rarity) {
        self.counts[rarity.index()] += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// All tiers in declaration order, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (Rarity, u64)> + '_ {
        Rarity::ALL.iter().map(move |r| (*r, self.get(*r)))
    }

    pub fn nonzero(&self) -> impl Iterator<Item = (Rarity, u64)> + '_ {
        self.iter().filter(|(_, count)| *count > 0)
    }
}
