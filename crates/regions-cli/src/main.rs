//! `regions` command line entry point.

use clap::Parser;

use regions_cli::cli::{Cli, Command};
use regions_cli::commands::{run_bootstrap, run_columns, run_format, run_identify, run_import};
use regions_cli::logging::{init_logging, log_config_from_cli};
use regions_cli::summary::{
    identifications_json, print_bootstrap, print_columns, print_format, print_identifications,
    print_import,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Bootstrap(args) => match run_bootstrap(&cli.store, args) {
            Ok(report) => {
                print_bootstrap(&report);
                0
            }
            Err(error) => fail(&error),
        },
        Command::Identify(args) => match run_identify(&cli.store, args) {
            Ok(results) => {
                if args.json {
                    println!("{}", identifications_json(&results));
                } else {
                    print_identifications(&results);
                }
                i32::from(results.iter().any(|r| r.resolution.is_none()))
            }
            Err(error) => fail(&error),
        },
        Command::Columns(args) => match run_columns(args) {
            Ok(report) => {
                print_columns(&report);
                i32::from(!report.missing.is_empty())
            }
            Err(error) => fail(&error),
        },
        Command::Import(args) => match run_import(&cli.store, args) {
            Ok(outcome) => {
                print_import(&outcome);
                0
            }
            Err(error) => fail(&error),
        },
        Command::Format(args) => match run_format(&cli.store, args) {
            Ok(outcome) => {
                print_format(&outcome);
                0
            }
            Err(error) => fail(&error),
        },
    };
    std::process::exit(exit_code);
}

fn fail(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}
