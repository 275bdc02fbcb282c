use gridfleet_routing::{
    build_distance_table, cluster, cluster_all, rank_savings, ClusterConfig, RouteGraph,
};
use gridfleet_world::{verify_routes, Grid, Params, Position, World};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Depot (1, 1) with tasks at (1, 3), (3, 1) and (5, 5) on an open grid —
/// the worked example for the savings pipeline.
fn three_task_world() -> (World, ClusterConfig) {
    let mut world = World::new(Grid::open(7, 7));
    let depot = Position::new(1, 1);
    world.add_station(depot);
    world.add_task(Position::new(1, 3));
    world.add_task(Position::new(3, 1));
    world.add_task(Position::new(5, 5));
    let config = ClusterConfig {
        depot,
        capacity: 2,
        lookahead: 1.5,
    };
    (world, config)
}

fn assert_partition(graph: &RouteGraph, num_tasks: usize) {
    let mut all: Vec<usize> = graph.groups().iter().flatten().copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..num_tasks).collect::<Vec<_>>());
}

#[test]
fn test_distance_table_values() {
    let (world, config) = three_task_world();
    let table = build_distance_table(&world, config.depot, 3).unwrap();
    assert_eq!(table.num_tasks(), 3);
    assert_eq!(table.depot_to(0), 2);
    assert_eq!(table.depot_to(1), 2);
    assert_eq!(table.depot_to(2), 8);
    assert_eq!(table.between(0, 1), 4);
    assert_eq!(table.between(0, 2), 6);
    assert_eq!(table.between(1, 2), 6);
    assert_eq!(table.between(2, 0), 6);
    assert_eq!(table.route_cost(&[0, 2]), 8);
    assert_eq!(table.route_cost(&[]), 0);
}

#[test]
fn test_savings_rank_descending_with_pair_tiebreak() {
    let (world, config) = three_task_world();
    let table = build_distance_table(&world, config.depot, 3).unwrap();
    let savings = rank_savings(&table);
    // savings(0,1) = 2 + 2 - 4 = 0; savings(0,2) = 2 + 8 - 6 = 4;
    // savings(1,2) = 2 + 8 - 6 = 4.
    assert_eq!(savings, vec![(4, 0, 2), (4, 1, 2), (0, 0, 1)]);
}

#[test]
fn test_cluster_three_task_scenario() {
    let (world, config) = three_task_world();
    let route = cluster(&world, &config).unwrap().unwrap();
    assert_eq!(route, vec![0, 2]);
}

#[test]
fn test_cluster_all_partitions_the_backlog() {
    let (world, config) = three_task_world();
    let routes = cluster_all(&world, &config).unwrap();
    assert_eq!(routes, vec![vec![0, 2], vec![1]]);
    verify_routes(&world, &routes, config.capacity).unwrap();
    assert!(routes.iter().all(|route| route.len() <= config.capacity));
}

#[test]
fn test_cluster_rejects_zero_capacity() {
    let (world, mut config) = three_task_world();
    config.capacity = 0;
    assert!(cluster(&world, &config).is_err());
    assert!(cluster_all(&world, &config).is_err());
}

#[test]
fn test_cluster_rejects_vanishing_lookahead() {
    let (world, mut config) = three_task_world();
    config.capacity = 1;
    config.lookahead = 0.5;
    assert!(cluster(&world, &config).is_err());
}

#[test]
fn test_cluster_empty_backlog_is_no_route() {
    let world = World::new(Grid::open(5, 5));
    let config = ClusterConfig::new(Position::new(2, 2), 4);
    assert_eq!(cluster(&world, &config).unwrap(), None);
    assert_eq!(cluster_all(&world, &config).unwrap(), Vec::<Vec<usize>>::new());
}

#[test]
fn test_cluster_unreachable_task_is_an_error() {
    let (mut world, config) = three_task_world();
    // Wall the (5, 5) task into its corner.
    world.grid.set_blocked(Position::new(4, 5), true);
    world.grid.set_blocked(Position::new(4, 6), true);
    world.grid.set_blocked(Position::new(5, 4), true);
    world.grid.set_blocked(Position::new(6, 4), true);
    assert!(cluster(&world, &config).is_err());
}

#[test]
fn test_single_task_backlog_yields_singleton_route() {
    let mut world = World::new(Grid::open(5, 5));
    world.add_task(Position::new(4, 4));
    let config = ClusterConfig::new(Position::new(0, 0), 3);
    assert_eq!(cluster(&world, &config).unwrap(), Some(vec![0]));
}

#[test]
fn test_merge_append_and_prepend_orientations() {
    let mut graph = RouteGraph::new(6);

    // tail-to-head
    assert!(graph.merge(0, 1));
    assert!(graph.groups().contains(&vec![0, 1]));
    // tail of [0, 1] to singleton
    assert!(graph.merge(1, 2));
    assert!(graph.groups().contains(&vec![0, 1, 2]));
    // head-to-head via singleton
    assert!(graph.merge(0, 3));
    assert!(graph.groups().contains(&vec![3, 0, 1, 2]));
    assert_partition(&graph, 6);
}

#[test]
fn test_merge_tail_to_tail_reverses_the_absorbed_side() {
    let mut graph = RouteGraph::new(4);
    assert!(graph.merge(0, 1)); // [0, 1]
    assert!(graph.merge(2, 3)); // [2, 3]
    assert!(graph.merge(1, 3)); // tails meet: [0, 1] + rev([2, 3])
    assert!(graph.groups().contains(&vec![0, 1, 3, 2]));
    assert_partition(&graph, 4);
}

#[test]
fn test_merge_head_to_head_reverses_the_absorbed_side() {
    let mut graph = RouteGraph::new(4);
    assert!(graph.merge(0, 1)); // [0, 1]
    assert!(graph.merge(2, 3)); // [2, 3]
    assert!(graph.merge(0, 2)); // heads meet: rev([2, 3]) + [0, 1]
    assert!(graph.groups().contains(&vec![3, 2, 0, 1]));
    assert_partition(&graph, 4);
}

#[test]
fn test_merge_refuses_same_group_and_interior_elements() {
    let mut graph = RouteGraph::new(5);
    assert!(graph.merge(0, 1));
    assert!(graph.merge(1, 2)); // [0, 1, 2]
    // 0 and 2 are endpoints of the same group
    assert!(!graph.merge(0, 2));
    // 1 is interior now
    assert!(!graph.merge(1, 3));
    assert!(!graph.merge(3, 1));
    // unknown vertex
    assert!(!graph.merge(0, 9));
    assert_partition(&graph, 5);
}

#[test]
fn test_route_graph_load_and_probes() {
    let mut graph = RouteGraph::new(5);
    assert_eq!(graph.load(0), 1);
    graph.merge(0, 1);
    graph.merge(1, 2);
    assert_eq!(graph.load(0), 3);
    assert_eq!(graph.load(1), 3);
    assert_eq!(graph.load(4), 1);
    assert_eq!(graph.load(7), 0);
    assert_eq!(graph.largest_group(), Some(&[0, 1, 2][..]));
    assert_eq!(graph.full_group(3), Some(&[0, 1, 2][..]));
    assert_eq!(graph.full_group(4), None);
}

#[test]
fn test_partition_invariant_survives_random_merges() {
    let mut rng = SmallRng::seed_from_u64(97);
    for _ in 0..20 {
        let mut graph = RouteGraph::new(10);
        for _ in 0..60 {
            let a = rng.gen_range(0..10);
            let b = rng.gen_range(0..10);
            if a != b {
                graph.merge(a, b);
            }
            assert_partition(&graph, 10);
        }
    }
}

#[test]
fn test_generated_world_clusters_within_capacity() {
    let params = Params {
        width: 10,
        height: 10,
        num_tasks: 9,
        obstacle_density: 0.0,
        num_hotspots: 2,
        hotspot_spread: 2.0,
    };
    let world = World::generate(&[3u8; 32], &params).unwrap();
    let config = ClusterConfig::new(world.stations[0], 3);
    let routes = cluster_all(&world, &config).unwrap();
    verify_routes(&world, &routes, config.capacity).unwrap();
    for route in &routes {
        assert!(!route.is_empty());
        assert!(route.len() <= config.capacity);
    }
}
