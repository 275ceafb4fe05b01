//! Link-budget engine for indoor macro coverage assessment.
//!
//! Given a macro site, a building and a target service, the engine estimates
//! indoor RSRP, the probability of meeting the service threshold under
//! log-normal shadowing, and whether a small cell should be deployed.
//!
//! This crate contains:
//! - **Scenario config**: TOML input, defaults per technology, hard limits
//! - **Propagation models**: FSPL, ITU-R P.1411, COST-231 Hata, simplified urban
//! - **Link budget**: building entry loss, RSRP, signal quality tiers
//! - **Coverage & decision**: Q-function probability, fade margin, recommendation
//! - **Reports**: assessment pipeline, chart data, CSV/Markdown/JSON export
//! - **Helpers**: power unit conversions, GPS distance

pub mod assessment;
pub mod chart;
pub mod coverage;
pub mod decision;
pub mod error;
pub mod export;
pub mod geo;
pub mod link_budget;
pub mod propagation;
pub mod scenario;
pub mod units;
pub mod validate;

pub use assessment::{AssessOptions, Assessment, DecisionMode, assess};
pub use error::AdvisorError;
pub use propagation::{PropagationModel, compare_models};
pub use scenario::{ScenarioConfig, ScenarioFile, ScenarioInput};
