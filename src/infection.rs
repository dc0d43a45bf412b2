use tracing::{info, warn};

use crate::{grid::GridTopology, random::RandomSource};

/// Result of seeding, `seeded` is lower than `requested` when there aren't enough eligible cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub requested: usize,
    pub seeded: usize,
    pub eligible: usize,
    pub cell_n: usize,
}

impl SeedReport {
    pub fn is_capped(&self) -> bool {
        self.seeded < self.requested
    }

    pub fn effective_fraction(&self) -> f64 {
        self.seeded as f64 / self.cell_n as f64
    }
}

/// Generation at which each cell got infected, `None` for cells never infected.
///
/// Start and goal cells are never infected, and a generation is never changed once set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfectionState {
    grid: GridTopology,
    generations: Vec<Option<usize>>,
}

impl InfectionState {
    pub fn new(grid: &GridTopology) -> Self {
        Self {
            grid: *grid,
            generations: vec![None; grid.cell_n()],
        }
    }

    pub fn grid(&self) -> &GridTopology {
        &self.grid
    }

    /// Infect `floor(cell_n * fraction)` distinct non-corner cells at generation 0.
    pub fn seed<R: RandomSource>(&mut self, fraction: f64, rng: &mut R) -> SeedReport {
        let cell_n = self.grid.cell_n();
        let requested = (cell_n as f64 * fraction).floor() as usize;
        let eligible_cells = (0..cell_n)
            .filter(|id| !self.grid.is_corner(*id) && self.generations[*id].is_none())
            .collect::<Vec<_>>();
        let report = SeedReport {
            requested,
            seeded: requested.min(eligible_cells.len()),
            eligible: eligible_cells.len(),
            cell_n,
        };
        if report.is_capped() {
            warn!(
                requested = report.requested,
                eligible = report.eligible,
                effective_fraction = report.effective_fraction(),
                "Not enough eligible cells for seeding, seed count capped."
            );
        }

        for id in rng.choose_distinct(&eligible_cells, report.seeded) {
            self.mark(id, 0);
        }
        info!(
            seeded = report.seeded,
            cell_n = report.cell_n,
            "Seeded initial infection."
        );

        report
    }

    /// Infect given cell at `generation` with chance `probability`.
    ///
    /// Corners and already infected cells are left untouched and consume no randomness.
    /// Return true if the cell got infected by this call.
    pub fn try_infect<R: RandomSource>(
        &mut self,
        id: usize,
        probability: f64,
        generation: usize,
        rng: &mut R,
    ) -> bool {
        if self.grid.is_corner(id) || self.is_infected(id) {
            return false;
        }

        if rng.sample() < probability {
            self.mark(id, generation);
            true
        } else {
            false
        }
    }

    pub fn generation(&self, id: usize) -> Option<usize> {
        self.generations.get(id).copied().flatten()
    }

    pub fn is_infected(&self, id: usize) -> bool {
        self.generation(id).is_some()
    }

    pub fn infected_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, generation)| generation.is_some())
            .map(|(id, _)| id)
    }

    pub fn infected_n(&self) -> usize {
        self.infected_cells().count()
    }

    /// Cells infected strictly before given round.
    pub fn infected_before(&self, round: usize) -> Vec<usize> {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, generation)| generation.is_some_and(|g| g < round))
            .map(|(id, _)| id)
            .collect()
    }

    fn mark(&mut self, id: usize, generation: usize) {
        debug_assert!(!self.grid.is_corner(id), "Corner cell({}) can't be infected.", id);
        debug_assert!(
            self.generations[id].is_none(),
            "Cell({}) has been infected already.",
            id
        );
        self.generations[id] = Some(generation);
    }
}
