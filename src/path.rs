use std::collections::VecDeque;

use tracing::info;

use crate::{
    grid::{GridTopology, Position},
    infection::InfectionState,
};

/// Links between neighboring cells that are both free of infection.
#[derive(Debug)]
pub struct Adjacency {
    links: Vec<Vec<usize>>, // Empty for infected cells.
}

impl Adjacency {
    pub fn new(state: &InfectionState) -> Self {
        let grid = state.grid();
        let links = (0..grid.cell_n())
            .map(|id| {
                if state.is_infected(id) {
                    Vec::new()
                } else {
                    grid.neighbors(id)
                        .filter(|n| !state.is_infected(*n))
                        .collect()
                }
            })
            .collect();

        Self { links }
    }

    pub fn linked(&self, id: usize) -> &[usize] {
        self.links.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Cells from start to goal (both included), each step to a neighbor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    cells: Vec<usize>,
}

impl Route {
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn steps_n(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn contains(&self, id: usize) -> bool {
        self.cells.contains(&id)
    }

    pub fn positions(&self, grid: &GridTopology) -> Vec<Position> {
        self.cells.iter().map(|id| grid.position(*id)).collect()
    }
}

/// Shortest route through uninfected cells from the start corner to the goal corner.
///
/// Breadth-first search over `Adjacency`, neighbors visited up, down, left, right,
/// so among routes of the same length the first one found in this order wins.
pub fn find_route(state: &InfectionState) -> Option<Route> {
    let grid = state.grid();
    let (start, goal) = (grid.start(), grid.goal());
    if state.is_infected(start) || state.is_infected(goal) {
        return None;
    }
    if start == goal {
        return Some(Route { cells: vec![start] });
    }

    let adjacency = Adjacency::new(state);
    let mut parents: Vec<Option<usize>> = vec![None; grid.cell_n()];
    let mut visited = vec![false; grid.cell_n()];
    visited[start] = true;
    let mut search_cells = VecDeque::from([start]);
    while let Some(cur_cell) = search_cells.pop_front() {
        for next_cell in adjacency.linked(cur_cell) {
            if visited[*next_cell] {
                continue;
            }

            visited[*next_cell] = true;
            parents[*next_cell] = Some(cur_cell);
            if *next_cell == goal {
                let route = Route {
                    cells: trace_back(&parents, goal),
                };
                info!(steps_n = route.steps_n(), "Found shortest route.");
                return Some(route);
            }
            search_cells.push_back(*next_cell);
        }
    }

    info!("No route between start and goal.");
    None
}

fn trace_back(parents: &[Option<usize>], goal: usize) -> Vec<usize> {
    let mut cells = vec![goal];
    let mut cur_cell = goal;
    while let Some(parent) = parents[cur_cell] {
        cells.push(parent);
        cur_cell = parent;
    }
    cells.reverse();

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedSource;

    fn infected_at(grid: &GridTopology, ids: &[usize]) -> InfectionState {
        let mut state = InfectionState::new(grid);
        let mut rng = ScriptedSource::constant(0.0);
        for id in ids {
            assert!(state.try_infect(*id, 1.0, 0, &mut rng));
        }
        state
    }

    fn route_positions(grid: &GridTopology, route: &Route) -> Vec<(usize, usize)> {
        route
            .positions(grid)
            .iter()
            .map(|p| (p.r(), p.c()))
            .collect()
    }

    #[test]
    fn two_by_two_goes_down_first() {
        let grid = GridTopology::new(2, 2);
        let route = find_route(&InfectionState::new(&grid)).unwrap();
        assert_eq!(route_positions(&grid, &route), vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn single_row_is_a_straight_line() {
        let grid = GridTopology::new(1, 5);
        let route = find_route(&InfectionState::new(&grid)).unwrap();
        assert_eq!(route.cells(), &[0, 1, 2, 3, 4]);
        assert_eq!(route.steps_n(), 4);
    }

    #[test]
    fn blocked_column_has_no_route() {
        let grid = GridTopology::new(3, 1);
        assert_eq!(find_route(&infected_at(&grid, &[1])), None);
    }

    #[test]
    fn single_cell_grid_is_its_own_route() {
        let grid = GridTopology::new(1, 1);
        let route = find_route(&InfectionState::new(&grid)).unwrap();
        assert_eq!(route.cells(), &[0]);
        assert_eq!(route.steps_n(), 0);
    }

    #[test]
    fn route_walks_around_infection() {
        // 0 1 2
        // x x 5
        // 6 7 8
        let grid = GridTopology::new(3, 3);
        let route = find_route(&infected_at(&grid, &[3, 4])).unwrap();
        assert_eq!(route.cells(), &[0, 1, 2, 5, 8]);
    }

    #[test]
    fn detour_is_taken_when_needed() {
        // 0 1 2 3
        // x x x 7
        // 8 9 a b
        // c x x f
        let grid = GridTopology::new(4, 4);
        let route = find_route(&infected_at(&grid, &[4, 5, 6, 13, 14])).unwrap();
        assert_eq!(route.cells(), &[0, 1, 2, 3, 7, 11, 15]);
    }

    #[test]
    fn adjacency_skips_infected_cells() {
        let grid = GridTopology::new(3, 3);
        let state = infected_at(&grid, &[1, 4]);
        let adjacency = Adjacency::new(&state);
        assert_eq!(adjacency.linked(0), &[3]);
        assert!(adjacency.linked(4).is_empty());
        assert_eq!(adjacency.linked(5), &[2, 8]);
        assert_eq!(adjacency.linked(7), &[6, 8]);
    }
}
