use tracing::debug;

use crate::{infection::InfectionState, random::RandomSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Seeded,
    Propagating(usize), // Last finished round.
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub round: usize,
    pub frontier: usize,
    pub infected: usize,
}

/// Generation-synchronous spreading of a seeded infection.
///
/// In round `r` every cell infected before `r` tries to infect each of its neighbors once,
/// cells infected during `r` only start to transmit from round `r + 1`.
pub struct Simulator<R> {
    state: InfectionState,
    risk: f64,
    iterations: usize,
    round: usize,
    rng: R,
}

impl<R: RandomSource> Simulator<R> {
    pub fn new(seeded: InfectionState, risk: f64, iterations: usize, rng: R) -> Self {
        Self {
            state: seeded,
            risk,
            iterations,
            round: 0,
            rng,
        }
    }

    pub fn sim_state(&self) -> SimState {
        if self.round >= self.iterations {
            SimState::Finalized
        } else if self.round == 0 {
            SimState::Seeded
        } else {
            SimState::Propagating(self.round)
        }
    }

    pub fn infection(&self) -> &InfectionState {
        &self.state
    }

    /// Run the next round, None if simulation has finished.
    pub fn advance(&mut self) -> Option<RoundReport> {
        if self.sim_state() == SimState::Finalized {
            return None;
        }

        let round = self.round + 1;
        let grid = *self.state.grid();
        // Snapshot before any change in this round.
        let frontier = self.state.infected_before(round);
        let mut infected = 0;
        for id in &frontier {
            for neighbor in grid.neighbors(*id) {
                if self
                    .state
                    .try_infect(neighbor, self.risk, round, &mut self.rng)
                {
                    infected += 1;
                }
            }
        }
        self.round = round;

        let report = RoundReport {
            round,
            frontier: frontier.len(),
            infected,
        };
        debug!(
            round = report.round,
            frontier = report.frontier,
            infected = report.infected,
            "Finished propagation round."
        );

        Some(report)
    }

    /// Run all rounds left, calling `observer` with the state before each round.
    pub fn run_with<F>(mut self, mut observer: F) -> InfectionState
    where
        F: FnMut(usize, &InfectionState),
    {
        while self.sim_state() != SimState::Finalized {
            observer(self.round, &self.state);
            self.advance();
        }

        self.state
    }

    pub fn run(self) -> InfectionState {
        self.run_with(|_, _| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::GridTopology,
        random::{ScriptedSource, SeededSource},
    };

    fn seeded_at(grid: &GridTopology, ids: &[usize]) -> InfectionState {
        let mut state = InfectionState::new(grid);
        let mut rng = ScriptedSource::constant(0.0);
        for id in ids {
            assert!(state.try_infect(*id, 1.0, 0, &mut rng));
        }
        state
    }

    #[test]
    fn zero_iterations_are_finalized_at_once() {
        let grid = GridTopology::new(3, 3);
        let seeded = seeded_at(&grid, &[4]);
        let mut sim = Simulator::new(seeded.clone(), 1.0, 0, ScriptedSource::constant(0.0));
        assert_eq!(sim.sim_state(), SimState::Finalized);
        assert_eq!(sim.advance(), None);
        assert_eq!(sim.run(), seeded);
    }

    #[test]
    fn state_machine_walks_through_rounds() {
        let grid = GridTopology::new(2, 2);
        let mut sim = Simulator::new(InfectionState::new(&grid), 0.5, 2, SeededSource::new(0));
        assert_eq!(sim.sim_state(), SimState::Seeded);
        assert_eq!(sim.advance().map(|r| r.round), Some(1));
        assert_eq!(sim.sim_state(), SimState::Propagating(1));
        assert_eq!(sim.advance().map(|r| r.round), Some(2));
        assert_eq!(sim.sim_state(), SimState::Finalized);
        assert_eq!(sim.advance(), None);
    }

    #[test]
    fn no_cascade_within_round() {
        // Middle of a single row, certain transmission: one step per round.
        let grid = GridTopology::new(1, 7);
        let mut sim = Simulator::new(seeded_at(&grid, &[3]), 1.0, 3, ScriptedSource::constant(0.0));
        let report = sim.advance().unwrap();
        assert_eq!(report.frontier, 1);
        assert_eq!(report.infected, 2);
        let state = sim.infection();
        assert_eq!(state.generation(2), Some(1));
        assert_eq!(state.generation(4), Some(1));
        assert_eq!(state.generation(1), None);
        assert_eq!(state.generation(5), None);

        let report = sim.advance().unwrap();
        assert_eq!(report.frontier, 3);
        assert_eq!(report.infected, 2);
        assert_eq!(sim.infection().generation(1), Some(2));
        assert_eq!(sim.infection().generation(5), Some(2));
        // Corners stay clean no matter how long it runs.
        let state = sim.run();
        assert!(!state.is_infected(0));
        assert!(!state.is_infected(6));
    }

    #[test]
    fn earlier_generations_keep_transmitting() {
        // Seed in column 1 fails in round 1 and succeeds in round 2.
        let grid = GridTopology::new(1, 4);
        let rng = ScriptedSource::new(&[0.9, 0.1], &[]);
        let mut sim = Simulator::new(seeded_at(&grid, &[1]), 0.5, 2, rng);
        assert_eq!(sim.advance().unwrap().infected, 0);
        assert_eq!(sim.advance().unwrap().infected, 1);
        assert_eq!(sim.infection().generation(2), Some(2));
    }

    #[test]
    fn empty_seed_never_spreads() {
        let grid = GridTopology::new(3, 3);
        let sim = Simulator::new(InfectionState::new(&grid), 1.0, 3, ScriptedSource::constant(0.0));
        assert_eq!(sim.run().infected_n(), 0);
    }

    #[test]
    fn observer_sees_every_round_before_it_runs() {
        let grid = GridTopology::new(3, 3);
        let sim = Simulator::new(seeded_at(&grid, &[4]), 1.0, 2, ScriptedSource::constant(0.0));
        let mut seen = Vec::new();
        let state = sim.run_with(|round, state| seen.push((round, state.infected_n())));
        assert_eq!(seen, vec![(0, 1), (1, 5)]);
        assert_eq!(state.infected_n(), 7);
    }

    #[test]
    fn generations_never_change_once_set() {
        let grid = GridTopology::new(5, 5);
        let mut seeded = InfectionState::new(&grid);
        seeded.seed(0.2, &mut SeededSource::new(11));
        let mut sim = Simulator::new(seeded, 0.4, 6, SeededSource::new(12));
        let mut last = sim.infection().clone();
        while sim.advance().is_some() {
            for id in last.infected_cells() {
                assert_eq!(sim.infection().generation(id), last.generation(id));
            }
            last = sim.infection().clone();
        }
    }
}
