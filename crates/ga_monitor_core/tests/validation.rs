use chrono::NaiveDate;
use ga_monitor_core::{format_date, DateRange, GaParameters, RunRequest, ValidationError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parses_valid_range_including_single_day() {
    let range = DateRange::parse("2024-01-01", "2024-01-07").unwrap();
    assert_eq!(range.start(), date(2024, 1, 1));
    assert_eq!(range.end(), date(2024, 1, 7));
    assert_eq!(range.days(), 7);

    let single = DateRange::parse(" 2024-03-05 ", "2024-03-05").unwrap();
    assert_eq!(single.days(), 1);
}

#[test]
fn rejects_missing_and_malformed_dates() {
    assert_eq!(
        DateRange::parse("", "2024-01-07").unwrap_err(),
        ValidationError::MissingDate {
            field: "start date"
        }
    );
    assert_eq!(
        DateRange::parse("2024-01-01", "   ").unwrap_err(),
        ValidationError::MissingDate { field: "end date" }
    );
    assert_eq!(
        DateRange::parse("2024-13-01", "2024-01-07").unwrap_err(),
        ValidationError::InvalidDate {
            field: "start date",
            value: "2024-13-01".to_string()
        }
    );
    assert!(matches!(
        DateRange::parse("2024-01-01", "07/01/2024"),
        Err(ValidationError::InvalidDate { field: "end date", .. })
    ));
}

#[test]
fn rejects_end_before_start() {
    let err = DateRange::parse("2024-01-07", "2024-01-01").unwrap_err();
    assert_eq!(
        err,
        ValidationError::EndBeforeStart {
            start: date(2024, 1, 7),
            end: date(2024, 1, 1)
        }
    );
    assert_eq!(
        err.to_string(),
        "end date 2024-01-01 is before start date 2024-01-07"
    );
}

#[test]
fn current_week_runs_monday_to_sunday() {
    // Wednesday
    let week = DateRange::current_week(date(2024, 1, 3));
    assert_eq!(week.start(), date(2024, 1, 1));
    assert_eq!(week.end(), date(2024, 1, 7));

    // Sunday stays in the week that started the previous Monday.
    let week = DateRange::current_week(date(2024, 1, 7));
    assert_eq!(week.start(), date(2024, 1, 1));

    let week = DateRange::current_week(date(2024, 1, 1));
    assert_eq!(format_date(week.start()), "2024-01-01");
    assert_eq!(format_date(week.end()), "2024-01-07");
}

#[test]
fn parameters_out_of_range_are_rejected() {
    let zero_population = GaParameters {
        population_size: Some(0),
        ..GaParameters::default()
    };
    assert!(matches!(
        zero_population.validate(),
        Err(ValidationError::ParameterOutOfRange {
            name: "populationSize",
            ..
        })
    ));

    let bad_rate = GaParameters {
        mutation_rate: Some(1.5),
        ..GaParameters::default()
    };
    assert!(matches!(
        RunRequest::parse("2024-01-01", "2024-01-07", bad_rate),
        Err(ValidationError::ParameterOutOfRange {
            name: "mutationRate",
            ..
        })
    ));

    let big_tournament = GaParameters {
        population_size: Some(4),
        tournament_size: Some(5),
        ..GaParameters::default()
    };
    assert!(big_tournament.validate().is_err());
}

#[test]
fn query_pairs_only_include_set_fields() {
    assert!(GaParameters::default().query_pairs().is_empty());
    assert!(GaParameters::default().is_empty());

    let parameters = GaParameters {
        population_size: Some(80),
        mutation_rate: Some(0.05),
        penalty_over_staffing: Some(30),
        ..GaParameters::default()
    };
    assert_eq!(
        parameters.query_pairs(),
        vec![
            ("populationSize", "80".to_string()),
            ("penaltyOverStaffing", "30".to_string()),
            ("mutationRate", "0.05".to_string()),
        ]
    );
}
