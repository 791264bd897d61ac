use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::rarity::{Rarity, RarityCounts, RarityTable};
use crate::{CaseError, Result};

/// One successful opening.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DrawRecord {
    pub sequence: u64,
    pub rarity: Rarity,
    pub item_name: String,
}

/// An opening that produced no item. The sequence number is still spent.
#[derive(Debug)]
pub struct DrawFailure {
    pub sequence: u64,
    pub error: CaseError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rarity_counts: RarityCounts,
    pub failures: Vec<DrawFailure>,
}

impl BatchReport {
    pub fn successes(&self) -> u64 {
        self.rarity_counts.total()
    }
}

/// Running totals for one session, across every batch opened so far.
#[derive(Clone, Debug)]
pub struct SessionState {
    item_counts: HashMap<String, u64>,
    draw_log: Vec<DrawRecord>,
    next_sequence: u64,
}

impl SessionState {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            item_counts: catalog
                .items()
                .iter()
                .map(|item| (item.name.clone(), 0))
                .collect(),
            draw_log: Vec::new(),
            next_sequence: 1,
        }
    }

    pub fn item_count(&self, name: &str) -> u64 {
        self.item_counts.get(name).copied().unwrap_or(0)
    }

    pub fn item_counts(&self) -> &HashMap<String, u64> {
        &self.item_counts
    }

    pub fn draw_log(&self) -> &[DrawRecord] {
        &self.draw_log
    }

    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn total_items(&self) -> u64 {
        self.item_counts.values().sum()
    }

    /// Starts a fresh session over the same catalog.
    pub fn reset(&mut self) {
        for count in self.item_counts.values_mut() {
            *count = 0;
        }
        self.draw_log.clear();
        self.next_sequence = 1;
    }

    fn record(&mut self, sequence: u64, rarity: Rarity, item_name: &str) {
        debug_assert!(
            self.item_counts.contains_key(item_name),
            "'{item_name}' is not in the catalog this session was created from"
        );
        *self.item_counts.entry(item_name.to_string()).or_insert(0) += 1;
        self.draw_log.push(DrawRecord {
            sequence,
            rarity,
            item_name: item_name.to_string(),
        });
    }
}

fn draw_one<'c, R: Rng + ?Sized>(
    catalog: &'c Catalog,
    table: &RarityTable,
    rng: &mut R,
) -> Result<(Rarity, &'c str)> {
    let rarity = table.sample(rng)?;
    let item = catalog.select(rarity, rng)?;
    Ok((rarity, item.name.as_str()))
}

/// Opens `count` cases into `state`. A draw that fails is logged, kept in
/// the returned report, and skipped; the rest of the batch still runs.
pub fn run_batch<R: Rng + ?Sized>(
    count: u32,
    catalog: &Catalog,
    table: &RarityTable,
    state: &mut SessionState,
    rng: &mut R,
) -> Result<BatchReport> {
    if count == 0 {
        return Err(CaseError::InvalidBatchSize {
            input: count.to_string(),
        });
    }

    let mut report = BatchReport::default();

    for _ in 0..count {
        let sequence = state.next_sequence;
        state.next_sequence += 1;

        match draw_one(catalog, table, rng) {
            Ok((rarity, item_name)) => {
                state.record(sequence, rarity, item_name);
                report.rarity_counts.increment(rarity);
            }
            Err(error) => {
                log::warn!("case {sequence} skipped: {error}");
                report.failures.push(DrawFailure { sequence, error });
            }
        }
    }

    log::debug!(
        "batch of {} finished: {} opened, {} skipped",
        count,
        report.successes(),
        report.failures.len()
    );

    Ok(report)
}
