//! Small cell recommendation from coverage probability.
//!
//! | Probability     | Recommendation           |
//! |-----------------|--------------------------|
//! | ≥ 0.95          | macro sufficient         |
//! | [0.80, 0.95)    | small cell recommended   |
//! | < 0.80          | small cell required      |

use std::fmt;

use serde::Serialize;

pub const MACRO_SUFFICIENT_MIN: f64 = 0.95;
pub const SMALL_CELL_RECOMMENDED_MIN: f64 = 0.80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    MacroSufficient,
    SmallCellRecommended,
    SmallCellRequired,
}

impl Recommendation {
    pub fn needs_small_cell(self) -> bool {
        !matches!(self, Recommendation::MacroSufficient)
    }

    /// One-line operator guidance.
    pub fn guidance(self) -> &'static str {
        match self {
            Recommendation::MacroSufficient => {
                "The existing macro cell provides reliable indoor coverage; no small cell is needed."
            }
            Recommendation::SmallCellRecommended => {
                "Coverage is marginal; a small cell is recommended to reach 95% reliability."
            }
            Recommendation::SmallCellRequired => {
                "Indoor coverage is insufficient; deploying a small cell is required to meet the service threshold."
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Recommendation::MacroSufficient => "MACRO_SUFFICIENT",
            Recommendation::SmallCellRecommended => "SMALL_CELL_RECOMMENDED",
            Recommendation::SmallCellRequired => "SMALL_CELL_REQUIRED",
        };
        f.write_str(name)
    }
}

/// Closed-open threshold classifier. NaN falls through to
/// [`Recommendation::SmallCellRequired`].
pub fn recommend(probability: f64) -> Recommendation {
    if probability >= MACRO_SUFFICIENT_MIN {
        Recommendation::MacroSufficient
    } else if probability >= SMALL_CELL_RECOMMENDED_MIN {
        Recommendation::SmallCellRecommended
    } else {
        Recommendation::SmallCellRequired
    }
}

/// RSRP-only decision used when shadowing is not modelled.
pub fn recommend_deterministic(rsrp_dbm: f64, threshold_dbm: f64) -> Recommendation {
    if rsrp_dbm >= threshold_dbm {
        Recommendation::MacroSufficient
    } else {
        Recommendation::SmallCellRequired
    }
}
