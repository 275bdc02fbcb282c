use crate::frontier::Frontier;
use crate::{HashMap, HashSet};
use anyhow::{anyhow, Result};
use gridfleet_world::{Direction, EdgeCosts, Grid, Position};

/// Edge cost strategy for the planner. `Uniform` charges 1 per step and is
/// what the savings table is built on; `Directional` reads the per-edge
/// cost table and is used for per-robot planning on weighted grids.
#[derive(Debug, Copy, Clone)]
pub enum CostModel<'a> {
    Uniform,
    Directional(&'a EdgeCosts),
}

impl CostModel<'_> {
    fn step(&self, direction: Direction) -> i32 {
        match self {
            CostModel::Uniform => 1,
            CostModel::Directional(costs) => costs.step(direction),
        }
    }

    // Cheapest possible step, used to scale the Manhattan heuristic so it
    // never overestimates on weighted grids.
    fn min_step(&self) -> i32 {
        match self {
            CostModel::Uniform => 1,
            CostModel::Directional(costs) => costs.min_step().max(0),
        }
    }
}

/// Result of one search pass: predecessor and accumulated-cost maps over
/// every expanded cell. A goal absent from `cost` is unreachable.
#[derive(Debug, Clone)]
pub struct SearchField {
    pub came_from: HashMap<Position, Option<Position>>,
    pub cost: HashMap<Position, i32>,
    /// The goal the search stopped on, if any was reached.
    pub reached_goal: Option<Position>,
}

impl SearchField {
    pub fn cost_to(&self, pos: Position) -> Option<i32> {
        self.cost.get(&pos).copied()
    }

    pub fn reached(&self, pos: Position) -> bool {
        self.cost.contains_key(&pos)
    }
}

/// A planned route: absolute cells start to goal, the parallel one-step
/// coordinate deltas, and the same steps as symbolic directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub positions: Vec<Position>,
    pub deltas: Vec<(i32, i32)>,
    pub directions: Vec<Direction>,
    pub cost: i32,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// A* over the grid. Expansion stops as soon as any goal is popped from the
/// frontier; with an empty goal set the search runs the frontier dry and
/// the field covers every cell reachable from `start` (exhaustive mode).
pub fn search(grid: &Grid, start: Position, goals: &[Position], costs: CostModel) -> SearchField {
    let mut frontier = Frontier::new();
    let mut came_from: HashMap<Position, Option<Position>> = HashMap::default();
    let mut cost_so_far: HashMap<Position, i32> = HashMap::default();
    let mut closed: HashSet<Position> = HashSet::default();

    frontier.put(start, heuristic(start, goals, &costs));
    came_from.insert(start, None);
    cost_so_far.insert(start, 0);

    let mut reached_goal = None;
    while let Some(current) = frontier.get() {
        // Stale duplicate of an already-expanded cell: discard.
        if !closed.insert(current) {
            continue;
        }
        if goals.contains(&current) {
            reached_goal = Some(current);
            break;
        }
        let current_cost = cost_so_far[&current];
        for next in grid.neighbors(current) {
            let direction = match Direction::from_delta(current.delta_to(&next)) {
                Some(direction) => direction,
                None => continue,
            };
            let new_cost = current_cost + costs.step(direction);
            if cost_so_far
                .get(&next)
                .map_or(true, |&recorded| new_cost < recorded)
            {
                cost_so_far.insert(next, new_cost);
                came_from.insert(next, Some(current));
                frontier.put(next, new_cost + heuristic(next, goals, &costs));
            }
        }
    }

    SearchField {
        came_from,
        cost: cost_so_far,
        reached_goal,
    }
}

/// Shortest path on the unit-cost grid, as a direction sequence plus the
/// cells it traverses. Unreachable goals fail explicitly.
pub fn plan(grid: &Grid, start: Position, goal: Position) -> Result<Plan> {
    plan_with(grid, start, &[goal], CostModel::Uniform)
}

/// Shortest path on a weighted grid toward the nearest of `goals`,
/// charging each step by its direction.
pub fn plan_weighted(
    grid: &Grid,
    start: Position,
    goals: &[Position],
    costs: &EdgeCosts,
) -> Result<Plan> {
    plan_with(grid, start, goals, CostModel::Directional(costs))
}

fn plan_with(grid: &Grid, start: Position, goals: &[Position], costs: CostModel) -> Result<Plan> {
    if goals.is_empty() {
        return Err(anyhow!("planning requires at least one goal"));
    }
    let field = search(grid, start, goals, costs);
    let reached = field.reached_goal.ok_or_else(|| match goals {
        [goal] => anyhow!(
            "no path from ({}, {}) to ({}, {})",
            start.x,
            start.y,
            goal.x,
            goal.y
        ),
        _ => anyhow!(
            "no path from ({}, {}) to any of {} goals",
            start.x,
            start.y,
            goals.len()
        ),
    })?;

    let mut positions = vec![reached];
    let mut current = reached;
    while let Some(&Some(previous)) = field.came_from.get(&current) {
        positions.push(previous);
        current = previous;
    }
    positions.reverse();

    let steps = positions.len().saturating_sub(1);
    let mut deltas = Vec::with_capacity(steps);
    let mut directions = Vec::with_capacity(steps);
    for window in positions.windows(2) {
        let delta = window[0].delta_to(&window[1]);
        let direction = Direction::from_delta(delta)
            .ok_or_else(|| anyhow!("reconstructed path contains a non-adjacent step"))?;
        deltas.push(delta);
        directions.push(direction);
    }

    Ok(Plan {
        cost: field.cost[&reached],
        positions,
        deltas,
        directions,
    })
}

fn heuristic(pos: Position, goals: &[Position], costs: &CostModel) -> i32 {
    goals
        .iter()
        .map(|goal| pos.manhattan_distance(goal))
        .min()
        .unwrap_or(0)
        * costs.min_step()
}
