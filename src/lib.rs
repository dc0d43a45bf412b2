use std::{error, fmt::Display};

use clap::Parser;

pub mod grid;
pub mod infection;
pub mod logging;
pub mod path;
pub mod random;
pub mod render;
pub mod sim;

use grid::GridTopology;
use infection::{InfectionState, SeedReport};
use path::Route;
use random::RandomSource;
use sim::Simulator;

/// Exit status for arguments out of their valid range, the same one clap uses for usage errors.
pub const INVALID_ARGUMENT_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    NonPositiveRows(i64),
    NonPositiveCols(i64),
    SeedFractionOutOfRange(f64),
    RiskOutOfRange(f64),
    NegativeIterations(i64),
    GridTooLarge(i64, i64),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NonPositiveRows(n) => {
                write!(f, "rows must be a positive integer, given {}.", n)
            }
            Error::NonPositiveCols(n) => {
                write!(f, "cols must be a positive integer, given {}.", n)
            }
            Error::SeedFractionOutOfRange(x) => {
                write!(f, "seed must be a number between 0 and 1, given {}.", x)
            }
            Error::RiskOutOfRange(x) => {
                write!(f, "risk must be a number between 0 and 1, given {}.", x)
            }
            Error::NegativeIterations(n) => {
                write!(f, "iterations must be a non-negative integer, given {}.", n)
            }
            Error::GridTooLarge(rows, cols) => {
                write!(f, "grid of {}x{} cells is too large.", rows, cols)
            }
        }
    }
}

impl error::Error for Error {}

/// Spread an infection over a grid, then find the shortest uninfected route
/// from the top left cell to the bottom right cell.
#[derive(Debug, Parser)]
#[command(allow_negative_numbers = true)]
pub struct CLIArgs {
    /// Number of rows
    pub rows: i64,
    /// Number of columns
    pub cols: i64,
    /// Fraction of cells infected before propagation, in [0, 1]
    pub seed: f64,
    /// Chance of an infected cell infecting a neighbor in one round, in [0, 1]
    pub risk: f64,
    /// Number of propagation rounds
    pub iterations: i64,
    /// Seed of the random number generator, drawn at random if absent
    #[arg(long)]
    pub rng_seed: Option<u64>,
    /// Show the grid before every propagation round
    #[arg(long)]
    pub show_generations: bool,
    /// Print markers without colors
    #[arg(long)]
    pub no_color: bool,
    /// Log more details to stderr, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CLIArgs {
    pub fn sim_params(&self) -> Result<SimParams, Error> {
        SimParams::new(self.rows, self.cols, self.seed, self.risk, self.iterations)
    }
}

/// Checked inputs of one simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    grid: GridTopology,
    seed_fraction: f64,
    risk: f64,
    iterations: usize,
}

impl SimParams {
    pub fn new(
        rows: i64,
        cols: i64,
        seed_fraction: f64,
        risk: f64,
        iterations: i64,
    ) -> Result<Self, Error> {
        if rows <= 0 {
            return Err(Error::NonPositiveRows(rows));
        }
        if cols <= 0 {
            return Err(Error::NonPositiveCols(cols));
        }
        let (row_n, col_n) = usize::try_from(rows)
            .ok()
            .zip(usize::try_from(cols).ok())
            .filter(|(row_n, col_n)| grid::checked_cell_n(*row_n, *col_n).is_some())
            .ok_or(Error::GridTooLarge(rows, cols))?;
        if !(0.0..=1.0).contains(&seed_fraction) {
            return Err(Error::SeedFractionOutOfRange(seed_fraction));
        }
        if !(0.0..=1.0).contains(&risk) {
            return Err(Error::RiskOutOfRange(risk));
        }
        let iterations =
            usize::try_from(iterations).map_err(|_| Error::NegativeIterations(iterations))?;

        Ok(Self {
            grid: GridTopology::new(row_n, col_n),
            seed_fraction,
            risk,
            iterations,
        })
    }

    pub fn grid(&self) -> &GridTopology {
        &self.grid
    }

    pub fn seed_fraction(&self) -> f64 {
        self.seed_fraction
    }

    pub fn risk(&self) -> f64 {
        self.risk
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub seed_report: SeedReport,
    pub infection: InfectionState,
    pub route: Option<Route>,
}

/// Seed, propagate and search, calling `observer` with the state before each round.
pub fn simulate_with<R, F>(params: &SimParams, mut rng: R, observer: F) -> Outcome
where
    R: RandomSource,
    F: FnMut(usize, &InfectionState),
{
    let mut seeded = InfectionState::new(params.grid());
    let seed_report = seeded.seed(params.seed_fraction(), &mut rng);
    let infection =
        Simulator::new(seeded, params.risk(), params.iterations(), rng).run_with(observer);
    let route = path::find_route(&infection);

    Outcome {
        seed_report,
        infection,
        route,
    }
}

pub fn simulate<R: RandomSource>(params: &SimParams, rng: R) -> Outcome {
    simulate_with(params, rng, |_, _| {})
}
