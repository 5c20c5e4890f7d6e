use chrono::NaiveDate;
use clap::Parser;
use ga_monitor_app::cli::{Cli, Command, RunArgs};
use ga_monitor_core::GaParameters;
use pretty_assertions::assert_eq;

#[test]
fn missing_dates_default_to_current_week() {
    // 2024-01-03 is a Wednesday.
    let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

    let (start, end) = RunArgs::default().dates(today);
    assert_eq!((start.as_str(), end.as_str()), ("2024-01-01", "2024-01-07"));

    let args = RunArgs {
        start: Some("2024-02-01".to_string()),
        ..RunArgs::default()
    };
    assert_eq!(args.dates(today).0, "2024-02-01");
}

#[test]
fn run_flags_become_ga_parameters() {
    let cli = Cli::try_parse_from([
        "ga_monitor",
        "run",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-07",
        "--population-size",
        "80",
        "--mutation-rate",
        "0.05",
        "--interval-ms",
        "500",
    ])
    .unwrap();

    let Command::Run(args) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.interval_ms, Some(500));
    assert_eq!(
        args.parameters(),
        GaParameters {
            population_size: Some(80),
            mutation_rate: Some(0.05),
            ..GaParameters::default()
        }
    );
}

#[test]
fn login_requires_a_token() {
    assert!(Cli::try_parse_from(["ga_monitor", "login"]).is_err());

    let cli = Cli::try_parse_from(["ga_monitor", "login", "--token", "abc"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Login { ref token, username: None } if token == "abc"
    ));
}
