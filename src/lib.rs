//! Interactive dashboard over yearly student headcounts by gender and
//! engineering specialisation.
//!
//! The pipeline is load -> filter -> derive -> aggregate -> present: a CSV
//! of (year, specialisation) headcount rows is loaded once, narrowed by the
//! active selection, enriched with per-row shares, rolled up by year and by
//! specialisation, and rendered as terminal previews plus exported chart
//! specs and data files.

pub mod aggregate;
pub mod charts;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod palette;
pub mod types;
pub mod util;

pub use error::DashboardError;
