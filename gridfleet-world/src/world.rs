use crate::grid::{Grid, Position};
use anyhow::{anyhow, Result};
use ndarray::Array2;
use rand::{
    distributions::{Distribution, Uniform},
    rngs::{SmallRng, StdRng},
    Rng, SeedableRng,
};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, Map, Value};
use statrs::function::erf::{erf, erf_inv};
use std::collections::HashSet;

/// A pickup waiting on the floor. The simulation loop advances `progress`
/// while a robot sits on the task and bumps `wait` while nothing does; the
/// routing core only ever reads `pos`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Task {
    pub pos: Position,
    pub work: i32,
    pub progress: i32,
    pub wait: i32,
}

impl Task {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            work: 10,
            progress: 0,
            wait: 0,
        }
    }

    pub fn add_progress(&mut self) {
        self.progress += 1;
    }

    pub fn reset_progress(&mut self) {
        self.progress = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.work
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Params {
    pub width: usize,
    pub height: usize,
    pub num_tasks: usize,
    pub obstacle_density: f64,
    pub num_hotspots: usize,
    pub hotspot_spread: f64,
}

impl Params {
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!("grid dimensions must be positive"));
        }
        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(anyhow!(
                "obstacle_density ({}) must be in [0, 1)",
                self.obstacle_density
            ));
        }
        if self.hotspot_spread <= 0.0 {
            return Err(anyhow!("hotspot_spread must be positive"));
        }
        Ok(())
    }
}

/// Read-only snapshot the routing core consumes: the obstacle grid, the
/// charging stations, and the task backlog in arrival order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct World {
    pub grid: Grid,
    pub stations: Vec<Position>,
    pub tasks: Vec<Task>,
}

impl TryFrom<Map<String, Value>> for World {
    type Error = serde_json::Error;

    fn try_from(v: Map<String, Value>) -> Result<Self, Self::Error> {
        from_value(Value::Object(v))
    }
}

impl World {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            stations: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn add_station(&mut self, pos: Position) {
        self.stations.push(pos);
    }

    pub fn add_task(&mut self, pos: Position) {
        self.tasks.push(Task::new(pos));
    }

    pub fn task_at(&self, pos: Position) -> Option<&Task> {
        self.tasks.iter().find(|task| task.pos == pos)
    }

    pub fn has_task_at(&self, pos: Position) -> bool {
        self.task_at(pos).is_some()
    }

    pub fn station_at(&self, pos: Position) -> Option<Position> {
        self.stations.iter().copied().find(|&station| station == pos)
    }

    /// Generate a random workspace: obstacles scattered at the configured
    /// density, a depot station kept clear in the centre, and tasks placed
    /// either uniformly or clustered around hotspot cells.
    pub fn generate(seed: &[u8; 32], params: &Params) -> Result<World> {
        params.validate()?;
        let mut rng = SmallRng::from_seed(StdRng::from_seed(seed.clone()).gen());
        let width = params.width;
        let height = params.height;
        let depot = Position::new((width / 2) as i32, (height / 2) as i32);

        let scatter =
            Array2::from_shape_fn((width, height), |_| rng.gen::<f64>() < params.obstacle_density);
        let mut layout = vec![vec![false; height]; width];
        for x in 0..width {
            for y in 0..height {
                layout[x][y] = scatter[[x, y]];
            }
        }
        let mut grid = Grid::from_layout(layout)?;
        grid.set_blocked(depot, false);

        let open_besides_depot = grid.open_cells() - 1;
        if open_besides_depot < params.num_tasks {
            return Err(anyhow!(
                "grid has {} open cells besides the depot, cannot place {} tasks",
                open_besides_depot,
                params.num_tasks
            ));
        }
        if params.num_hotspots > 0 && open_besides_depot == 0 {
            return Err(anyhow!("grid too dense to place hotspots"));
        }

        let x_distr = Uniform::new(0, width as i32);
        let y_distr = Uniform::new(0, height as i32);

        let mut hotspots: Vec<Position> = Vec::with_capacity(params.num_hotspots);
        while hotspots.len() < params.num_hotspots {
            let pos = Position::new(x_distr.sample(&mut rng), y_distr.sample(&mut rng));
            if !grid.is_blocked(pos) && pos != depot {
                hotspots.push(pos);
            }
        }

        let mut world = World::new(grid);
        world.add_station(depot);
        let mut occupied: HashSet<Position> = HashSet::with_capacity(params.num_tasks + 1);
        occupied.insert(depot);

        while world.tasks.len() < params.num_tasks {
            let pos = if hotspots.is_empty() || rng.gen::<f64>() < 0.5 {
                Position::new(x_distr.sample(&mut rng), y_distr.sample(&mut rng))
            } else {
                let hotspot = hotspots[rng.gen_range(0..hotspots.len())];
                Position::new(
                    truncated_normal_sample(
                        &mut rng,
                        hotspot.x as f64,
                        params.hotspot_spread,
                        0.0,
                        (width - 1) as f64,
                    )
                    .round() as i32,
                    truncated_normal_sample(
                        &mut rng,
                        hotspot.y as f64,
                        params.hotspot_spread,
                        0.0,
                        (height - 1) as f64,
                    )
                    .round() as i32,
                )
            };
            if world.grid.is_blocked(pos) || occupied.contains(&pos) {
                continue;
            }
            occupied.insert(pos);
            world.add_task(pos);
        }

        Ok(world)
    }
}

/// Check a full assignment: every route within capacity, every task index
/// in range, every task covered exactly once across all routes.
pub fn verify_routes(world: &World, routes: &[Vec<usize>], capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(anyhow!("capacity must be a positive task count"));
    }
    let mut visited = vec![false; world.tasks.len()];
    for route in routes {
        if route.is_empty() {
            return Err(anyhow!("each route must visit at least one task"));
        }
        if route.len() > capacity {
            return Err(anyhow!(
                "route of {} tasks exceeds capacity {}",
                route.len(),
                capacity
            ));
        }
        for &task in route {
            if task >= world.tasks.len() {
                return Err(anyhow!(
                    "task index {} out of range (backlog has {} tasks)",
                    task,
                    world.tasks.len()
                ));
            }
            if visited[task] {
                return Err(anyhow!("task {} appears in more than one route", task));
            }
            visited[task] = true;
        }
    }
    if let Some(missing) = visited.iter().position(|&v| !v) {
        return Err(anyhow!("task {} is not covered by any route", missing));
    }
    Ok(())
}

fn truncated_normal_sample<T: Rng>(
    rng: &mut T,
    mean: f64,
    std_dev: f64,
    min_val: f64,
    max_val: f64,
) -> f64 {
    let cdf_min = 0.5 * (1.0 + erf((min_val - mean) / (std_dev * (2.0_f64).sqrt())));
    let cdf_max = 0.5 * (1.0 + erf((max_val - mean) / (std_dev * (2.0_f64).sqrt())));
    let sample = rng.gen::<f64>() * (cdf_max - cdf_min) + cdf_min;
    mean + std_dev * (2.0_f64).sqrt() * erf_inv(2.0 * sample - 1.0)
}
