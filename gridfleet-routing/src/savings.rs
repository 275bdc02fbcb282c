use crate::planner::{search, CostModel};
use anyhow::{anyhow, Result};
use gridfleet_world::{Position, World};
use ndarray::Array2;

/// All-pairs shortest distances over {depot} ∪ {considered tasks}. Row and
/// column 0 are the depot; task `i` of the considered prefix sits at
/// `i + 1`. Built once per clustering round, read-only afterwards.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    costs: Array2<i32>,
}

impl DistanceTable {
    /// Number of tasks covered (the depot is not counted).
    pub fn num_tasks(&self) -> usize {
        self.costs.nrows() - 1
    }

    pub fn depot_to(&self, task: usize) -> i32 {
        self.costs[[0, task + 1]]
    }

    pub fn between(&self, a: usize, b: usize) -> i32 {
        self.costs[[a + 1, b + 1]]
    }

    /// One-way trip cost: depot to the first stop, then stop to stop.
    pub fn route_cost(&self, route: &[usize]) -> i32 {
        match route.first() {
            None => 0,
            Some(&first) => {
                self.depot_to(first)
                    + route
                        .windows(2)
                        .map(|pair| self.between(pair[0], pair[1]))
                        .sum::<i32>()
            }
        }
    }
}

/// Run one uniform-cost search per stop pair. Quadratic in the number of
/// considered tasks, which is why the clusterer caps the prefix it hands
/// in rather than tabulating the whole backlog.
pub fn build_distance_table(
    world: &World,
    depot: Position,
    considered: usize,
) -> Result<DistanceTable> {
    let mut stops = Vec::with_capacity(considered + 1);
    stops.push(depot);
    stops.extend(world.tasks.iter().take(considered).map(|task| task.pos));

    let n = stops.len();
    let mut costs = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let field = search(&world.grid, stops[i], &[stops[j]], CostModel::Uniform);
            let cost = field.cost_to(stops[j]).ok_or_else(|| {
                anyhow!(
                    "no path between stop ({}, {}) and stop ({}, {})",
                    stops[i].x,
                    stops[i].y,
                    stops[j].x,
                    stops[j].y
                )
            })?;
            costs[[i, j]] = cost;
            costs[[j, i]] = cost;
        }
    }
    Ok(DistanceTable { costs })
}

/// Clarke-Wright savings for every unordered task pair, sorted by savings
/// descending. Ties break on the pair itself so the order is reproducible.
pub fn rank_savings(table: &DistanceTable) -> Vec<(i32, usize, usize)> {
    let n = table.num_tasks();
    let mut savings = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let value = table.depot_to(i) + table.depot_to(j) - table.between(i, j);
            savings.push((value, i, j));
        }
    }
    savings.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    savings
}
