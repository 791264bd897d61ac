use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{CaseError, Result};

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Currency {
    EUR,
    USD,
}

impl Currency {
    /// Currency selector positions, as offered to the user.
    pub const SELECTOR: [Currency; 2] = [Currency::EUR, Currency::USD];

    pub fn from_selector(index: usize) -> Result<Self> {
        Self::SELECTOR
            .get(index)
            .copied()
            .ok_or_else(|| CaseError::UnsupportedCurrency {
                code: format!("selector #{index}"),
            })
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EUR => "EUR",
            Self::USD => "USD",
        }
    }

    /// Price of a single opening in cents.
    pub fn unit_cents(self) -> u64 {
        match self {
            Self::EUR => 235,
            Self::USD => 250,
        }
    }

    pub fn total_cents(self, count: u32) -> u64 {
        self.unit_cents() * u64::from(count)
    }
}

impl FromStr for Currency {
    type Err = CaseError;

    fn from_str(code: &str) -> Result<Self> {
        match code {
            "EUR" => Ok(Self::EUR),
            "USD" => Ok(Self::USD),
            _ => Err(CaseError::UnsupportedCurrency {
                code: code.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

pub fn try_calculate_price(count: u32, currency_code: &str) -> Result<f64> {
    let currency: Currency = currency_code.parse()?;
    Ok(currency.total_cents(count) as f64 / 100.0)
}

/// Total price for `count` openings. Unknown currencies are logged and
/// priced at zero.
pub fn calculate_price(count: u32, currency_code: &str) -> f64 {
    match try_calculate_price(count, currency_code) {
        Ok(price) => price,
        Err(err) => {
            log::error!("pricing {count} openings failed: {err}");
            0.0
        }
    }
}
