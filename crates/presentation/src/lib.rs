//! # Presentation
//!
//! Consumers of the computed metrics: SVG charts, the plain-text report and a
//! JSON copy of the `MetricsReport`. None of them derive new figures; they only
//! lay out what the `analytics` crate produced, and each tolerates missing inputs.

pub mod charts;
pub mod error;
pub mod format;
pub mod report;
pub mod svg;

pub use charts::ChartRenderer;
pub use error::PresentationError;
pub use format::{format_count, format_float, format_value, headline_figures};
pub use report::ReportWriter;
