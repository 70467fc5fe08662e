//! Headless симуляция Furball
//!
//! Прогоняет один сценарий без рендера: кот кашляет, ест мышь,
//! прячется в сумку и вылезает обратно.

use bevy::prelude::*;
use furball_simulation::actions::perform_action;
use furball_simulation::interaction::{equip_hand, map_init};
use furball_simulation::pseudo_item::insert_pseudo_item;
use furball_simulation::storage::remove_from_container;
use furball_simulation::{
    create_headless_app, log_info, run_fixed_tick, Bloodstream, Felinid, FelinidFood, Hairball,
    Hands, Hunger, PseudoItem, SimulationPlugin, Solution, SolutionContainer, Storage,
};

const TICK: f32 = 1.0 / 60.0;

fn main() {
    let seed = 42;
    println!("Starting Furball headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    let world = app.world_mut();

    let cat = world
        .spawn((
            Name::new("Tom"),
            Felinid::with_default_actions(),
            PseudoItem::default(),
            Hunger::new(100.0),
            Hands::default(),
            Transform::default(),
            Bloodstream::default(),
            SolutionContainer::default()
                .with_solution("chemicals", Solution::default().with_reagent("Nutriment", 40.0)),
        ))
        .id();
    map_init(world, cat);

    // Кашель
    if let Some(action) = world.get::<Felinid>(cat).and_then(|f| f.hairball_action_entity) {
        perform_action(world, action);
    }
    for tick in 0..180 {
        run_fixed_tick(world, TICK);

        if tick % 60 == 0 {
            let hairballs = world.query::<&Hairball>().iter(world).count();
            println!("Tick {}: {} hairball(s)", tick, hairballs);
        }
    }

    // Мышь
    let mouse = world.spawn((Name::new("Mouse"), FelinidFood)).id();
    equip_hand(world, cat, mouse);
    if let Some(action) = world.get::<Felinid>(cat).and_then(|f| f.eat_action_entity) {
        perform_action(world, action);
    }
    if let Some(hunger) = world.get::<Hunger>(cat) {
        log_info(&format!("Hunger after mouse: {:.1}", hunger.current));
    }

    // Сумка
    let bag = world.spawn((Name::new("Duffel bag"), Storage::default())).id();
    let hidden = insert_pseudo_item(world, bag, cat);
    log_info(&format!("Cat hidden in bag: {}", hidden));
    remove_from_container(world, bag, cat);

    let disguised = world.get::<PseudoItem>(cat).is_some_and(|p| p.active);
    log_info(&format!("Cat still disguised after removal: {}", disguised));

    println!("Simulation complete!");
}
