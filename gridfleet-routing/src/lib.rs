use ahash::RandomState;

pub(crate) type HashMap<K, V> = std::collections::HashMap<K, V, RandomState>;
pub(crate) type HashSet<T> = std::collections::HashSet<T, RandomState>;

pub mod cluster;
pub mod frontier;
pub mod planner;
pub mod route_graph;
pub mod savings;

pub use cluster::{cluster, cluster_all, ClusterConfig};
pub use frontier::Frontier;
pub use planner::{plan, plan_weighted, search, CostModel, Plan, SearchField};
pub use route_graph::RouteGraph;
pub use savings::{build_distance_table, rank_savings, DistanceTable};
