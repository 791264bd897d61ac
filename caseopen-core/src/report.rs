use serde::Serialize;

use crate::catalog::Catalog;
use crate::rarity::Rarity;
use crate::session::SessionState;
use crate::OpenOutcome;

/// A line of output, colored when it belongs to a rarity.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReportLine {
    pub text: String,
    pub rarity: Option<Rarity>,
}

impl ReportLine {
    fn plain(text: String) -> Self {
        Self { text, rarity: None }
    }

    fn colored(text: String, rarity: Rarity) -> Self {
        Self {
            text,
            rarity: Some(rarity),
        }
    }

    pub fn color(&self) -> Option<&'static str> {
        self.rarity.map(Rarity::color)
    }
}

/// What a front-end shows after a batch: the batch summary and the whole
/// session log.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    pub rarity_lines: Vec<ReportLine>,
    pub price_line: String,
    pub item_lines: Vec<ReportLine>,
    pub log_lines: Vec<ReportLine>,
    pub failure_lines: Vec<String>,
    pub currency_line: Option<String>,
}

impl Report {
    pub fn build(outcome: &OpenOutcome, catalog: &Catalog, state: &SessionState) -> Self {
        let rarity_lines = outcome
            .batch
            .rarity_counts
            .nonzero()
            .map(|(rarity, count)| ReportLine::colored(format!("{rarity}: {count}"), rarity))
            .collect();

        let price_line = format!(
            "Total Price: {} {:.2}",
            outcome.currency_code, outcome.price
        );

        let item_lines = catalog
            .items()
            .iter()
            .filter_map(|item| {
                let count = state.item_count(&item.name);
                (count > 0).then(|| ReportLine::plain(format!("{}: {}", item.name, count)))
            })
            .collect();

        let log_lines = state
            .draw_log()
            .iter()
            .map(|record| {
                ReportLine::colored(
                    format!(
                        "Case {}: {} - {}",
                        record.sequence, record.rarity, record.item_name
                    ),
                    record.rarity,
                )
            })
            .collect();

        let failure_lines = outcome
            .batch
            .failures
            .iter()
            .map(|failure| format!("Case {}: {}", failure.sequence, failure.error))
            .collect();

        let currency_line = outcome
            .currency_error
            .as_ref()
            .map(|err| format!("Price not calculated: {err}"));

        Self {
            rarity_lines,
            price_line,
            item_lines,
            log_lines,
            failure_lines,
            currency_line,
        }
    }

    /// Rarity counts, price and item counts, in display order.
    pub fn summary(&self) -> impl Iterator<Item = ReportLine> + '_ {
        self.rarity_lines
            .iter()
            .cloned()
            .chain(std::iter::once(ReportLine::plain(self.price_line.clone())))
            .chain(self.item_lines.iter().cloned())
    }
}
