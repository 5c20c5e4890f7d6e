use chrono::{Datelike, Days, NaiveDate};

/// Wire and input format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingDate { field: &'static str },
    #[error("{field} '{value}' is not a valid YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("{name} must be {expected}, got {value}")]
    ParameterOutOfRange {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive range of calendar days a schedule is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = parse_date("start date", start)?;
        let end = parse_date("end date", end)?;
        Self::new(start, end)
    }

    /// Monday through Sunday of the week containing `today`.
    pub fn current_week(today: NaiveDate) -> Self {
        let offset = u64::from(today.weekday().num_days_from_monday());
        let monday = today - Days::new(offset);
        let sunday = monday + Days::new(6);
        Self {
            start: monday,
            end: sunday,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingDate { field });
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Optional GA tuning knobs; the backend applies its own default for each unset field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GaParameters {
    pub population_size: Option<u32>,
    pub max_generations: Option<u32>,
    pub mutation_rate: Option<f64>,
    pub crossover_rate: Option<f64>,
    pub tournament_size: Option<u32>,
    pub penalty_hard_constraint: Option<u32>,
    pub penalty_under_staffing: Option<u32>,
    pub penalty_over_staffing: Option<u32>,
    pub penalty_forbidden_succession: Option<u32>,
}

impl GaParameters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        positive("populationSize", self.population_size)?;
        positive("maxGenerations", self.max_generations)?;
        positive("tournamentSize", self.tournament_size)?;
        unit_interval("mutationRate", self.mutation_rate)?;
        unit_interval("crossoverRate", self.crossover_rate)?;

        if let (Some(tournament), Some(population)) = (self.tournament_size, self.population_size)
        {
            if tournament > population {
                return Err(ValidationError::ParameterOutOfRange {
                    name: "tournamentSize",
                    expected: "at most populationSize",
                    value: tournament.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Query parameters in the backend's naming, set fields only.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let integers = [
            ("populationSize", self.population_size),
            ("maxGenerations", self.max_generations),
            ("tournamentSize", self.tournament_size),
            ("penaltyHardConstraint", self.penalty_hard_constraint),
            ("penaltyUnderStaffing", self.penalty_under_staffing),
            ("penaltyOverStaffing", self.penalty_over_staffing),
            ("penaltyForbiddenSuccession", self.penalty_forbidden_succession),
        ];
        let rates = [
            ("mutationRate", self.mutation_rate),
            ("crossoverRate", self.crossover_rate),
        ];

        integers
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v.to_string())))
            .chain(
                rates
                    .into_iter()
                    .filter_map(|(name, value)| value.map(|v| (name, v.to_string()))),
            )
            .collect()
    }
}

fn positive(name: &'static str, value: Option<u32>) -> Result<(), ValidationError> {
    match value {
        Some(0) => Err(ValidationError::ParameterOutOfRange {
            name,
            expected: "greater than 0",
            value: "0".to_string(),
        }),
        _ => Ok(()),
    }
}

fn unit_interval(name: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(rate) if !(0.0..=1.0).contains(&rate) => Err(ValidationError::ParameterOutOfRange {
            name,
            expected: "between 0.0 and 1.0",
            value: rate.to_string(),
        }),
        _ => Ok(()),
    }
}

/// A validated request to start a GA job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRequest {
    pub range: DateRange,
    pub parameters: GaParameters,
}

impl RunRequest {
    pub fn new(range: DateRange, parameters: GaParameters) -> Result<Self, ValidationError> {
        parameters.validate()?;
        Ok(Self { range, parameters })
    }

    pub fn parse(
        start_date: &str,
        end_date: &str,
        parameters: GaParameters,
    ) -> Result<Self, ValidationError> {
        Self::new(DateRange::parse(start_date, end_date)?, parameters)
    }
}
