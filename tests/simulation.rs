use lexgraph::{Edge, EntityType, Node, Simulation, SimulationConfig};

fn people(ids: &[&str]) -> Vec<Node> {
    ids.iter()
        .map(|id| Node::new(*id, format!("Person {id}"), EntityType::Person))
        .collect()
}

fn square_with_tail() -> (Vec<Node>, Vec<Edge>) {
    let nodes = people(&["a", "b", "c", "d", "e"]);
    let edges = vec![
        Edge::new("a", "b", "KNOWS"),
        Edge::new("b", "c", "KNOWS"),
        Edge::new("c", "d", "KNOWS"),
        Edge::new("d", "a", "KNOWS"),
        Edge::new("d", "e", "KNOWS"),
    ];
    (nodes, edges)
}

#[test]
fn alpha_decays_monotonically_until_the_layout_settles() {
    let (nodes, edges) = square_with_tail();
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.set_snapshot(&nodes, &edges);

    let mut previous_alpha = sim.alpha();
    let mut late_deltas = Vec::new();
    let mut ticks = 0;
    while sim.is_running() {
        let before = sim.positions();
        sim.tick();
        ticks += 1;
        assert!(sim.alpha() < previous_alpha);
        previous_alpha = sim.alpha();

        let moved = before
            .iter()
            .zip(sim.positions())
            .map(|(old, new)| ((new.x - old.x).powi(2) + (new.y - old.y).powi(2)).sqrt())
            .fold(0.0_f32, f32::max);
        late_deltas.push(moved);
        assert!(ticks < 5_000, "alpha never fell below the stop threshold");
    }

    assert!(sim.alpha() <= sim.config().alpha_min);
    let tail = &late_deltas[late_deltas.len() - 5..];
    assert!(tail.iter().all(|delta| *delta < 0.05), "late deltas {tail:?}");
    assert!(tail.iter().all(|delta| *delta <= late_deltas[0]));

    let settled = sim.positions();
    assert!(!sim.tick());
    assert_eq!(sim.positions(), settled);
}

#[test]
fn pinned_node_stays_exactly_on_its_pin() {
    let (nodes, edges) = square_with_tail();
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.set_snapshot(&nodes, &edges);

    sim.pin("d", 13.5, -42.25);
    for _ in 0..200 {
        sim.tick();
        let position = sim.position("d").unwrap();
        assert_eq!((position.x, position.y), (13.5, -42.25));
    }

    sim.unpin("d");
    sim.reheat();
    sim.tick();
    let released = sim.position("d").unwrap();
    assert_ne!((released.x, released.y), (13.5, -42.25));
}

#[test]
fn surviving_nodes_keep_their_position_across_snapshots() {
    let (nodes, edges) = square_with_tail();
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.set_snapshot(&nodes, &edges);
    for _ in 0..40 {
        sim.tick();
    }
    let kept = sim.position("c").unwrap();

    let mut next_nodes = people(&["z", "c", "y"]);
    next_nodes.push(Node::new("court", "Court", EntityType::Court));
    sim.set_snapshot(&next_nodes, &[Edge::new("c", "court", "HEARD_IN")]);

    assert_eq!(sim.position("c"), Some(kept));
    assert_eq!(sim.alpha(), 1.0);
    assert!(!sim.contains("a"));
    assert_eq!(sim.node_count(), 4);

    let center = sim.center();
    let radius = sim.config().initial_radius;
    let seeded = sim.position("y").unwrap();
    let angle = std::f32::consts::TAU * 2.0 / 4.0;
    assert!((seeded.x - (center.x + angle.cos() * radius)).abs() < 1e-3);
    assert!((seeded.y - (center.y + angle.sin() * radius)).abs() < 1e-3);
}

#[test]
fn linked_entities_settle_near_the_spring_rest_length() {
    let nodes = people(&["a", "b", "x"]);
    let edges = vec![Edge::new("a", "b", "KNOWS")];
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.set_snapshot(&nodes, &edges);
    sim.run_until_settled(5_000);

    let a = sim.position("a").unwrap();
    let b = sim.position("b").unwrap();
    let linked = (a - b).length();
    let rest = sim.config().spring_length;
    assert!(linked.is_finite());
    assert!((linked - rest).abs() < rest, "linked distance {linked}");
}

#[test]
fn coincident_nodes_do_not_produce_non_finite_positions() {
    let nodes = people(&["a", "b"]);
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.set_snapshot(&nodes, &[Edge::new("a", "b", "KNOWS")]);
    sim.pin("a", 400.0, 300.0);
    sim.pin("b", 400.0, 300.0);
    sim.tick();
    sim.unpin("b");

    sim.run_until_settled(5_000);
    for position in sim.positions() {
        assert!(position.x.is_finite() && position.y.is_finite());
    }
}
