//! `costsens run`: build the experiment configuration from a JSON file and
//! command line overrides, then fit every weighting scheme.
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;

use costsens_classifiers::config::{ModelType, Solver};
use costsens_classifiers::experiment::{
    load_experiment_config, run_experiment, ExperimentConfig, ExperimentResult,
};
use costsens_classifiers::io::write_results_tsv;
use costsens_classifiers::report::write_html_report;

use crate::util::{delimiter_for, validate_data_file};

pub const DEFAULT_REPORT: &str = "costsens_report.html";

/// Everything `run` needs besides the experiment configuration itself.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub data: PathBuf,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl RunArgs {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let data = matches
            .get_one::<PathBuf>("data")
            .cloned()
            .context("Missing data file argument")?;
        let report = if matches.get_flag("no_report") {
            None
        } else {
            Some(
                matches
                    .get_one::<PathBuf>("report")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT)),
            )
        };
        Ok(Self {
            data,
            output: matches.get_one::<PathBuf>("output").cloned(),
            report,
        })
    }
}

/// Load the JSON config when one is given, otherwise start from defaults.
pub fn load_or_default(config_path: Option<&PathBuf>) -> Result<ExperimentConfig> {
    match config_path {
        Some(path) => {
            log::info!("Using config: {:?}", path);
            load_experiment_config(path)
        }
        None => {
            eprintln!("[costsens] No config provided; using defaults.");
            Ok(ExperimentConfig::default())
        }
    }
}

/// Apply command line overrides on top of `config`.
pub fn apply_overrides(config: &mut ExperimentConfig, matches: &ArgMatches) -> Result<()> {
    if let Some(label) = matches.get_one::<String>("label_column") {
        config.data.reader.label_column = label.clone();
    }
    if let Some(&n) = matches.get_one::<usize>("sample") {
        config.data.sample_rows = Some(n);
    }
    if let Some(&fraction) = matches.get_one::<f64>("test_size") {
        config.test_fraction = fraction;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = seed;
    }
    if matches.get_flag("stratify") {
        config.stratify = true;
    }
    if matches.get_flag("scale") {
        config.scale_features = true;
    }
    // --model resets hyper-parameters to that model's defaults; --c and
    // --solver apply on top.
    if let Some(model) = matches.get_one::<String>("model") {
        config.model.model_type = ModelType::from_str(model).map_err(anyhow::Error::msg)?;
    }
    if let Some(&c) = matches.get_one::<f64>("c") {
        if !(c.is_finite() && c > 0.0) {
            anyhow::bail!("--c must be finite and positive, got {}", c);
        }
        config.model.model_type = config.model.model_type.clone().with_c(c);
    }
    if let Some(solver) = matches.get_one::<String>("solver") {
        let solver = Solver::from_str(solver).map_err(anyhow::Error::msg)?;
        config.model.model_type = config.model.model_type.clone().with_solver(solver);
    }
    Ok(())
}

/// Pick the delimiter from the file extension unless the config set a
/// non-default one.
pub fn resolve_delimiter(config: &mut ExperimentConfig, data: &Path) {
    if config.data.reader.delimiter == ',' {
        if let Some(delimiter) = delimiter_for(data) {
            config.data.reader.delimiter = delimiter;
        }
    }
}

/// Run the experiment and write the optional TSV summary and HTML report.
pub fn execute(args: &RunArgs, config: &ExperimentConfig) -> Result<ExperimentResult> {
    validate_data_file(&args.data)?;
    let mut config = config.clone();
    resolve_delimiter(&mut config, &args.data);

    let result = run_experiment(&args.data, &config)?;

    if let Some(path) = &args.output {
        write_results_tsv(&result.runs, path)?;
    }
    if let Some(path) = &args.report {
        write_html_report(&result, path)?;
    }
    Ok(result)
}
