pub mod grid;
pub mod world;

pub use grid::{Direction, EdgeCosts, Grid, Position};
pub use world::{verify_routes, Params, Task, World};
