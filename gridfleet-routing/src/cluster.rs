use crate::route_graph::RouteGraph;
use crate::savings::{build_distance_table, rank_savings};
use anyhow::{anyhow, Result};
use gridfleet_world::{Position, World};

/// Clustering parameters, passed explicitly rather than read from ambient
/// globals. `lookahead` is the temporal priority factor: only the first
/// `lookahead × capacity` tasks of the backlog are considered per round,
/// bounding the quadratic distance-table build.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClusterConfig {
    pub depot: Position,
    pub capacity: usize,
    pub lookahead: f32,
}

impl ClusterConfig {
    pub fn new(depot: Position, capacity: usize) -> Self {
        Self {
            depot,
            capacity,
            lookahead: 1.0,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(anyhow!("capacity must be a positive task count"));
        }
        if self.considered(usize::MAX) == 0 {
            return Err(anyhow!(
                "lookahead ({}) times capacity ({}) admits no tasks",
                self.lookahead,
                self.capacity
            ));
        }
        Ok(())
    }

    fn considered(&self, backlog: usize) -> usize {
        ((self.capacity as f32 * self.lookahead).floor() as usize).min(backlog)
    }
}

/// Group the front of the task backlog into one capacity-bounded route.
///
/// Builds the all-pairs distance table over the considered prefix, ranks
/// the Clarke-Wright savings, then greedily merges route segments while the
/// combined load fits. Returns the first group that exactly fills the
/// vehicle, else the largest group once savings are exhausted; `Ok(None)`
/// when the backlog is empty.
pub fn cluster(world: &World, config: &ClusterConfig) -> Result<Option<Vec<usize>>> {
    config.validate()?;
    let considered = config.considered(world.tasks.len());
    if considered == 0 {
        return Ok(None);
    }

    let table = build_distance_table(world, config.depot, considered)?;
    let savings = rank_savings(&table);

    let mut graph = RouteGraph::new(considered);
    let mut unassigned: Vec<usize> = (0..considered).collect();

    for (_, i, j) in savings {
        if unassigned.is_empty() {
            break;
        }
        if let Some(full) = graph.full_group(config.capacity) {
            return Ok(Some(full.to_vec()));
        }
        if graph.load(i) + graph.load(j) <= config.capacity && graph.merge(i, j) {
            unassigned.retain(|&vert| vert != i && vert != j);
        }
    }

    Ok(graph.largest_group().map(|group| group.to_vec()))
}

/// Repeatedly cluster the remaining backlog until every task is routed,
/// yielding the full set of capacity-bounded routes in assignment order.
/// Indices in the returned routes refer to `world.tasks`.
pub fn cluster_all(world: &World, config: &ClusterConfig) -> Result<Vec<Vec<usize>>> {
    config.validate()?;
    let mut scratch = world.clone();
    let mut backlog: Vec<usize> = (0..world.tasks.len()).collect();
    let mut routes = Vec::new();

    while !backlog.is_empty() {
        let route = match cluster(&scratch, config)? {
            Some(route) => route,
            None => break,
        };
        routes.push(route.iter().map(|&local| backlog[local]).collect());

        let mut taken = route;
        taken.sort_unstable_by(|a, b| b.cmp(a));
        for local in taken {
            scratch.tasks.remove(local);
            backlog.remove(local);
        }
    }

    Ok(routes)
}
