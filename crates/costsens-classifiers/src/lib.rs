//! costsens-classifiers: cost-sensitive logistic regression for imbalanced data.
//!
//! This crate provides a weighted logistic regression model, class/sample
//! weighting helpers, a seeded train/test split, ROC-AUC evaluation and small
//! reporting helpers. The `experiment` module wires these together into the
//! load -> split -> fit -> score flow used by the command line tool.
pub mod config;
pub mod dataset;
pub mod error;
pub mod experiment;
pub mod io;
pub mod metrics;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod split;
pub mod weighting;
