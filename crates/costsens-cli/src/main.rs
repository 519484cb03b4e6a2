use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use costsens_classifiers::experiment::ExperimentConfig;
use costsens_cli::run::{apply_overrides, execute, load_or_default, RunArgs};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("COSTSENS_LOG", "error,costsens=info"))
        .init();

    let matches = Command::new("costsens")
        .version(clap::crate_version!())
        .about("Cost-sensitive logistic regression on imbalanced tabular data")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Fit logistic regression under each weighting scheme and report ROC-AUC")
                .arg(
                    Arg::new("data")
                        .help("Path to the labelled data file (*.csv or *.tsv)")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .help("Path to experiment JSON configuration file")
                        .required(false)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("label_column")
                        .short('l')
                        .long("label-column")
                        .help("Name of the label column. Overrides the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("sample")
                        .long("sample")
                        .help("Randomly keep this many rows before splitting.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("test_size")
                        .short('t')
                        .long("test-size")
                        .help("Fraction of rows held out for testing, in (0, 1).")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .help("Seed for sampling and the train/test split.")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("stratify")
                        .long("stratify")
                        .help("Keep the class ratio equal in both subsets.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("scale")
                        .long("scale")
                        .help("Standardise features using training-set statistics.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Model type; resets its hyper-parameters to the defaults.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("c")
                        .short('c')
                        .long("c")
                        .help("Inverse L2 regularisation strength (> 0).")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("solver")
                        .long("solver")
                        .help("Override the optimisation routine.")
                        .value_parser(["newton", "gradient_descent"])
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write a per-scheme summary (TSV) to this path.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Path of the HTML report. Defaults to costsens_report.html.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("report"),
                ),
        )
        .subcommand(
            Command::new("template").about("Print the default experiment configuration as JSON"),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("run", run_matches)) => handle_run(run_matches),
        Some(("template", _)) => {
            println!("{}", serde_json::to_string_pretty(&ExperimentConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_run(matches: &ArgMatches) -> Result<()> {
    let args = RunArgs::from_arguments(matches)?;
    log::info!("Running weighting comparison on {:?}", args.data);

    let mut config = load_or_default(matches.get_one::<PathBuf>("config"))?;
    apply_overrides(&mut config, matches)?;
    log::info!("Model: {}", config.model.model_type.name());

    match execute(&args, &config) {
        Ok(result) => {
            for run in &result.runs {
                println!("{}\n", run);
            }
            if let Some(best) = result.best_by_test_auc() {
                log::info!(
                    "Best test ROC-AUC: {} ({:.4})",
                    best.scheme,
                    best.test.roc_auc
                );
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Run failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
