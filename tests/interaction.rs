use lexgraph::interaction::Scene;
use lexgraph::{
    Command, Edge, EngineConfig, EntityType, GraphSnapshot, InteractionController,
    InteractionEvent, LayoutEngine, Node, PointerButton, PointerEvent,
};

fn loaded_engine() -> LayoutEngine {
    let mut engine = LayoutEngine::new(EngineConfig::default()).unwrap();
    engine.load(GraphSnapshot::new(
        vec![
            Node::new("p1", "Jane Roe", EntityType::Person),
            Node::new("o1", "Acme Holdings", EntityType::Organization),
            Node::new("c1", "Roe v. Acme", EntityType::Case),
        ],
        vec![
            Edge::new("p1", "o1", "EMPLOYED_BY"),
            Edge::new("o1", "c1", "PARTY_TO"),
        ],
    ));
    engine
}

fn screen_of(engine: &LayoutEngine, id: &str) -> (f32, f32) {
    let world = engine.simulation().position(id).unwrap();
    let screen = engine.view().world_to_screen(world);
    (screen.x, screen.y)
}

#[test]
fn dragging_a_node_moves_it_under_the_pointer() {
    let mut engine = loaded_engine();
    let mut controller = InteractionController::new(&engine.config().view);

    let (x, y) = screen_of(&engine, "o1");
    let down = controller.handle(
        &engine,
        PointerEvent::Down {
            x,
            y,
            button: PointerButton::Primary,
        },
    );
    engine.submit_all(down.commands);

    let moved = controller.handle(&engine, PointerEvent::Move { x: 120.0, y: 90.0 });
    engine.submit_all(moved.commands);
    for _ in 0..5 {
        engine.tick();
        assert_eq!(screen_of(&engine, "o1"), (120.0, 90.0));
    }

    let up = controller.handle(&engine, PointerEvent::Up { x: 120.0, y: 90.0 });
    assert!(up.commands.contains(&Command::Unpin { id: "o1".into() }));
    engine.submit_all(up.commands);
    engine.tick();
    assert!(!engine.simulation().is_pinned("o1"));
}

#[test]
fn dragging_under_zoom_maps_back_to_simulation_space() {
    let mut engine = loaded_engine();
    let mut controller = InteractionController::new(&engine.config().view);

    for _ in 0..4 {
        let wheel = controller.handle(
            &engine,
            PointerEvent::Wheel {
                delta: 1.0,
                x: 250.0,
                y: 250.0,
            },
        );
        engine.submit_all(wheel.commands);
    }
    engine.tick();
    assert!((engine.view().zoom - 1.1_f32.powi(4)).abs() < 1e-4);

    let (x, y) = screen_of(&engine, "c1");
    let down = controller.handle(
        &engine,
        PointerEvent::Down {
            x,
            y,
            button: PointerButton::Primary,
        },
    );
    engine.submit_all(down.commands);
    let moved = controller.handle(&engine, PointerEvent::Move { x: 500.0, y: 200.0 });
    engine.submit_all(moved.commands);
    engine.tick();

    let expected = engine.view().screen_to_world(eframe::egui::pos2(500.0, 200.0));
    assert_eq!(engine.simulation().position("c1"), Some(expected));
}

#[test]
fn click_surfaces_the_full_node_record() {
    let engine = loaded_engine();
    let mut controller = InteractionController::new(&engine.config().view);

    let (x, y) = screen_of(&engine, "p1");
    controller.handle(
        &engine,
        PointerEvent::Down {
            x,
            y,
            button: PointerButton::Primary,
        },
    );
    let up = controller.handle(&engine, PointerEvent::Up { x, y });

    let clicked = up.events.into_iter().find_map(|event| match event {
        InteractionEvent::Click(node) => Some(node),
        InteractionEvent::Hover(_) => None,
    });
    assert_eq!(clicked, Some(Node::new("p1", "Jane Roe", EntityType::Person)));
}

#[test]
fn panning_leaves_node_positions_alone() {
    let mut engine = loaded_engine();
    engine.simulation_mut().pin("p1", 10.0, 10.0);
    let mut controller = InteractionController::new(&engine.config().view);

    let empty = (790.0, 590.0);
    assert!(engine.node_at(eframe::egui::pos2(empty.0, empty.1)).is_none());

    let mut commands = controller
        .handle(
            &engine,
            PointerEvent::Down {
                x: empty.0,
                y: empty.1,
                button: PointerButton::Primary,
            },
        )
        .commands;
    commands.extend(
        controller
            .handle(&engine, PointerEvent::Move { x: 700.0, y: 560.0 })
            .commands,
    );
    assert_eq!(commands, [Command::Pan { dx: -90.0, dy: -30.0 }]);

    engine.submit_all(commands);
    engine.tick();
    let pinned = engine.simulation().position("p1").unwrap();
    assert_eq!((pinned.x, pinned.y), (10.0, 10.0));
    assert_eq!(engine.view().pan, eframe::egui::vec2(-90.0, -30.0));
    assert_eq!(Scene::view(&engine).pan.x, -90.0);
}
