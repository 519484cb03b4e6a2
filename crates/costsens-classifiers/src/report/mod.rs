//! Reporting and plotting helpers.
//!
//! Plots are small helper functions converting run results into
//! `plotly::Plot`; `html` assembles them into a standalone report page.
pub mod html;
pub mod plots;

pub use html::{render_report, write_html_report};
