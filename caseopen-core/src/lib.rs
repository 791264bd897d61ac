use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub mod catalog;
pub mod pricing;
pub mod rarity;
pub mod report;
pub mod session;

use catalog::Catalog;
use pricing::{try_calculate_price, Currency};
use rarity::{Rarity, RarityTable};
use report::Report;
use session::{run_batch, BatchReport, SessionState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenerSettings {
    pub catalog_path: PathBuf,
    pub count: u32,
    pub currency_index: usize,
    pub seed: Option<u64>,
    pub batches: u32,
}

#[derive(Debug, Error)]
pub enum CaseError {
    #[error("roll {roll:.4} fell outside every rarity bucket")]
    NoRarityMatched { roll: f64 },
    #[error("no items of rarity {rarity} in catalog")]
    EmptyRarityPool { rarity: Rarity },
    #[error("invalid number of openings: '{input}'")]
    InvalidBatchSize { input: String },
    #[error("currency not supported: '{code}'")]
    UnsupportedCurrency { code: String },
    #[error("failed to load catalog {origin}: {reason}")]
    CatalogLoadFailure { origin: String, reason: String },
    #[error("invalid rarity table: {0}")]
    InvalidRarityTable(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CaseError>;

/// Parses a user-supplied opening count. Only positive whole numbers pass.
pub fn parse_open_count(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(count) if count > 0 && !trimmed.starts_with('+') => Ok(count),
        _ => Err(CaseError::InvalidBatchSize {
            input: input.to_string(),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub count: u32,
    pub currency_code: String,
}

#[derive(Debug)]
pub struct OpenOutcome {
    pub currency_code: String,
    pub count: u32,
    pub price: f64,
    /// Set when the currency code was not recognised and the price fell
    /// back to zero.
    pub currency_error: Option<CaseError>,
    pub batch: BatchReport,
}

/// Prices and opens one batch. A zero count is refused before anything is
/// priced or drawn.
pub fn open_cases<R: Rng + ?Sized>(
    request: &OpenRequest,
    catalog: &Catalog,
    table: &RarityTable,
    state: &mut SessionState,
    rng: &mut R,
) -> Result<OpenOutcome> {
    if request.count == 0 {
        return Err(CaseError::InvalidBatchSize {
            input: request.count.to_string(),
        });
    }

    let (price, currency_error) = match try_calculate_price(request.count, &request.currency_code) {
        Ok(price) => (price, None),
        Err(err) => {
            log::error!("pricing {} openings failed: {err}", request.count);
            (0.0, Some(err))
        }
    };
    let batch = run_batch(request.count, catalog, table, state, rng)?;

    log::info!(
        "opened {} of {} cases for {} {:.2}",
        batch.successes(),
        request.count,
        request.currency_code,
        price
    );

    Ok(OpenOutcome {
        currency_code: request.currency_code.clone(),
        count: request.count,
        price,
        currency_error,
        batch,
    })
}

#[derive(Debug)]
pub struct RunSummary {
    pub seed: u64,
    pub reports: Vec<Report>,
}

pub fn run(settings: &OpenerSettings) -> Result<RunSummary> {
    if settings.batches == 0 {
        return Err(CaseError::Config(
            "at least one batch must be requested".to_string(),
        ));
    }
    if settings.count == 0 {
        return Err(CaseError::InvalidBatchSize {
            input: settings.count.to_string(),
        });
    }

    let catalog = Catalog::load(&settings.catalog_path)?;
    let table = RarityTable::default();

    if !table.is_complete() {
        log::warn!(
            "rarity weights sum to {:.2}, some rolls will match no rarity",
            table.total()
        );
    }
    for rarity in catalog.missing_rarities(&table) {
        log::warn!("catalog has no {rarity} items; those draws will be skipped");
    }

    let seed = settings
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen::<u64>());
    log::info!("using seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let currency_code = Currency::from_selector(settings.currency_index)
        .map(|currency| currency.code().to_string())
        .unwrap_or_else(|_| format!("#{}", settings.currency_index));
    let request = OpenRequest {
        count: settings.count,
        currency_code,
    };

    let mut state = SessionState::new(&catalog);
    let mut reports = Vec::with_capacity(settings.batches as usize);
    for _ in 0..settings.batches {
        let outcome = open_cases(&request, &catalog, &table, &mut state, &mut rng)?;
        reports.push(Report::build(&outcome, &catalog, &state));
    }

    Ok(RunSummary { seed, reports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Item;

    #[test]
    fn parses_positive_counts_only() {
        assert_eq!(parse_open_count("4").unwrap(), 4);
        assert_eq!(parse_open_count(" 12 ").unwrap(), 12);
        for bad in ["", "0", "-3", "2.5", "abc", "+4", "99999999999"] {
            assert!(
                matches!(parse_open_count(bad), Err(CaseError::InvalidBatchSize { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_request_is_rejected_before_drawing() {
        let catalog = Catalog::new(vec![Item::new("Thing", Rarity::MilSpec)]).unwrap();
        let table = RarityTable::default();
        let mut state = SessionState::new(&catalog);
        let mut rng = StdRng::seed_from_u64(0);
        let request = OpenRequest {
            count: 0,
            currency_code: "EUR".to_string(),
        };

        assert!(matches!(
            open_cases(&request, &catalog, &table, &mut state, &mut rng),
            Err(CaseError::InvalidBatchSize { .. })
        ));
        assert_eq!(state.next_sequence(), 1);
    }

    #[test]
    fn unsupported_currency_still_opens() {
        let catalog = Catalog::new(vec![Item::new("Thing", Rarity::MilSpec)]).unwrap();
        let table = RarityTable::new(vec![(Rarity::MilSpec, 100.0)]).unwrap();
        let mut state = SessionState::new(&catalog);
        let mut rng = StdRng::seed_from_u64(0);
        let request = OpenRequest {
            count: 4,
            currency_code: "XYZ".to_string(),
        };

        let outcome = open_cases(&request, &catalog, &table, &mut state, &mut rng).unwrap();
        assert_eq!(outcome.price, 0.0);
        assert!(matches!(
            outcome.currency_error,
            Some(CaseError::UnsupportedCurrency { ref code }) if code == "XYZ"
        ));
        assert_eq!(outcome.batch.successes(), 4);
        assert_eq!(state.item_count("Thing"), 4);
    }

    #[test]
    fn known_currency_has_no_error() {
        let catalog = Catalog::new(vec![Item::new("Thing", Rarity::MilSpec)]).unwrap();
        let table = RarityTable::default();
        let mut state = SessionState::new(&catalog);
        let mut rng = StdRng::seed_from_u64(0);
        let request = OpenRequest {
            count: 4,
            currency_code: "EUR".to_string(),
        };

        let outcome = open_cases(&request, &catalog, &table, &mut state, &mut rng).unwrap();
        assert_eq!(outcome.price, 9.40);
        assert!(outcome.currency_error.is_none());
    }
}
