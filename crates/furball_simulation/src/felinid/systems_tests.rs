//! Tests for felinid observers and hairball sweep.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::rngs::mock::StepRng;

    use crate::actions::{perform_action, Action};
    use crate::components::*;
    use crate::interaction::{
        equip_hand, map_init, throw_hit, try_pickup, unequip_hand, NauseaTriggered, PlaySound,
        PopupKind, PopupNotice,
    };
    use crate::{run_fixed_tick, DeterministicRng, SimulationPlugin};

    fn app_with_rng(rng: Option<DeterministicRng>) -> App {
        let mut app = App::new();
        if let Some(rng) = rng {
            app.insert_resource(rng);
        }
        app.add_plugins(SimulationPlugin);
        app
    }

    fn setup_app() -> App {
        app_with_rng(None)
    }

    fn spawn_felinid(world: &mut World) -> Entity {
        let felinid = world
            .spawn((
                Felinid::with_default_actions(),
                Hunger::new(100.0),
                Hands::default(),
                Transform::default(),
            ))
            .id();
        map_init(world, felinid);
        felinid
    }

    fn popups(world: &World) -> Vec<PopupNotice> {
        world
            .resource::<Events<PopupNotice>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn sounds(world: &World) -> Vec<PlaySound> {
        world
            .resource::<Events<PlaySound>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    fn nausea_count(world: &World) -> usize {
        world
            .resource::<Events<NauseaTriggered>>()
            .iter_current_update_events()
            .count()
    }

    fn hairball_handle(world: &World, felinid: Entity) -> Entity {
        world
            .get::<Felinid>(felinid)
            .and_then(|f| f.hairball_action_entity)
            .expect("hairball action granted")
    }

    fn put_on_mask(world: &mut World, felinid: Entity) -> Entity {
        let mask = world.spawn(IngestionBlocker::default()).id();
        let mut slots = InventorySlots::default();
        slots.set_slot(MASK_SLOT, mask);
        world.entity_mut(felinid).insert(slots);
        mask
    }

    #[test]
    fn test_map_init_grants_hairball_action() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);

        let handle = hairball_handle(world, felinid);
        let action = world.get::<Action>(handle).expect("action entity");
        assert_eq!(action.owner, felinid);
        assert_eq!(action.charges, Some(1));
    }

    #[test]
    fn test_map_init_without_configured_action() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = world.spawn(Felinid::default()).id();

        map_init(world, felinid);

        assert!(world.get::<Felinid>(felinid).is_some_and(|f| f.hairball_action_entity.is_none()));
        assert_eq!(world.query::<&Action>().iter(world).count(), 0);
    }

    #[test]
    fn test_cough_starts_hairball() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let handle = hairball_handle(world, felinid);

        assert!(perform_action(world, handle));

        let coughing = world.get::<CoughingUpHairball>(felinid).expect("coughing");
        assert_eq!(coughing.accumulator, 0.0);
        assert_eq!(coughing.cough_up_time, 2.15);

        let popups = popups(world);
        assert_eq!(popups.len(), 1);
        assert_eq!(popups[0].key, "hairball-cough");
        assert_eq!(popups[0].recipient, None);
        assert_eq!(sounds(world)[0].path, crate::felinid::HAIRBALL_SOUND);

        // Единственный charge потрачен
        let action = world.get::<Action>(handle).expect("action");
        assert_eq!(action.charges, Some(0));
        assert!(!action.is_usable());
    }

    #[test]
    fn test_cough_blocked_by_mask() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let mask = put_on_mask(world, felinid);
        let handle = hairball_handle(world, felinid);

        assert!(!perform_action(world, handle));

        assert!(world.get::<CoughingUpHairball>(felinid).is_none());
        let popups = popups(world);
        assert_eq!(popups[0].key, "hairball-mask");
        assert_eq!(popups[0].recipient, Some(felinid));
        assert_eq!(popups[0].args, vec![("mask", mask)]);
        assert_eq!(world.get::<Action>(handle).and_then(|a| a.charges), Some(1));
    }

    #[test]
    fn test_disabled_mask_does_not_block() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let mask = put_on_mask(world, felinid);
        world.entity_mut(mask).insert(IngestionBlocker { enabled: false });
        let handle = hairball_handle(world, felinid);

        assert!(perform_action(world, handle));
        assert!(world.get::<CoughingUpHairball>(felinid).is_some());
    }

    #[test]
    fn test_hairball_spawns_after_cough_up_time() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        world.entity_mut(felinid).insert((
            Bloodstream::default(),
            SolutionContainer::default()
                .with_solution("chemicals", Solution::default().with_reagent("Nutriment", 30.0)),
        ));
        let handle = hairball_handle(world, felinid);
        assert!(perform_action(world, handle));

        run_fixed_tick(world, 1.0);
        run_fixed_tick(world, 1.0);
        assert_eq!(world.query::<&Hairball>().iter(world).count(), 0);
        assert!(world.get::<CoughingUpHairball>(felinid).is_some());

        run_fixed_tick(world, 1.0);

        let hairballs: Vec<_> = world
            .query::<(&Hairball, &SolutionContainer)>()
            .iter(world)
            .map(|(h, s)| s.get(&h.solution_name).map(|sol| sol.volume()).unwrap_or(0.0))
            .collect();
        assert_eq!(hairballs.len(), 1);
        assert!((hairballs[0] - 20.0).abs() < 1e-4);
        assert!(world.get::<CoughingUpHairball>(felinid).is_none());

        let left = world
            .get::<SolutionContainer>(felinid)
            .and_then(|s| s.get("chemicals"))
            .map(|s| s.volume())
            .unwrap_or(0.0);
        assert!((left - 10.0).abs() < 1e-4);

        // Больше не спавним
        run_fixed_tick(world, 5.0);
        assert_eq!(world.query::<&Hairball>().iter(world).count(), 1);
    }

    #[test]
    fn test_cough_while_coughing_keeps_countdown() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let handle = hairball_handle(world, felinid);
        assert!(perform_action(world, handle));

        run_fixed_tick(world, 1.0);

        // Мышь возвращает charge, кашляем повторно до spawn
        let mouse = world.spawn(FelinidFood).id();
        equip_hand(world, felinid, mouse);
        let eat = world
            .get::<Felinid>(felinid)
            .and_then(|f| f.eat_action_entity)
            .expect("eat action");
        assert!(perform_action(world, eat));
        assert!(perform_action(world, handle));

        let coughing = world.get::<CoughingUpHairball>(felinid).expect("coughing");
        assert_eq!(coughing.accumulator, 1.0);

        run_fixed_tick(world, 1.0);
        assert_eq!(world.query::<&Hairball>().iter(world).count(), 0);

        run_fixed_tick(world, 1.0);
        assert_eq!(world.query::<&Hairball>().iter(world).count(), 1);
        assert!(world.get::<CoughingUpHairball>(felinid).is_none());

        run_fixed_tick(world, 5.0);
        assert_eq!(world.query::<&Hairball>().iter(world).count(), 1);
    }

    #[test]
    fn test_hairball_spawns_without_bloodstream() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let handle = hairball_handle(world, felinid);
        assert!(perform_action(world, handle));

        run_fixed_tick(world, 3.0);

        assert_eq!(world.query::<&Hairball>().iter(world).count(), 1);
        assert!(world.get::<CoughingUpHairball>(felinid).is_none());
    }

    #[test]
    fn test_equip_food_grants_eat_action() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let mouse = world.spawn(FelinidFood).id();

        equip_hand(world, felinid, mouse);

        let state = world.get::<Felinid>(felinid).expect("felinid");
        assert_eq!(state.eat_action_target, Some(mouse));
        let handle = state.eat_action_entity.expect("eat action");
        assert!(world.get::<Action>(handle).is_some());
    }

    #[test]
    fn test_equip_non_food_ignored() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let wrench = world.spawn_empty().id();

        equip_hand(world, felinid, wrench);

        let state = world.get::<Felinid>(felinid).expect("felinid");
        assert!(state.eat_action_target.is_none());
        assert!(state.eat_action_entity.is_none());
    }

    #[test]
    fn test_unequip_revokes_eat_action_once() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let mouse = world.spawn(FelinidFood).id();
        let wrench = world.spawn_empty().id();

        equip_hand(world, felinid, mouse);
        let handle = world
            .get::<Felinid>(felinid)
            .and_then(|f| f.eat_action_entity)
            .expect("eat action");

        assert_eq!(unequip_hand(world, felinid), Some(mouse));
        let state = world.get::<Felinid>(felinid).expect("felinid");
        assert!(state.eat_action_target.is_none());
        assert!(state.eat_action_entity.is_none());
        assert!(world.get_entity(handle).is_err());

        // Посторонний unequip ничего не трогает
        equip_hand(world, felinid, wrench);
        assert_eq!(unequip_hand(world, felinid), Some(wrench));
        assert_eq!(world.query::<&Action>().iter(world).count(), 1);
    }

    #[test]
    fn test_eat_mouse() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        let hairball = hairball_handle(world, felinid);
        assert!(perform_action(world, hairball));

        let mouse = world.spawn(FelinidFood).id();
        equip_hand(world, felinid, mouse);
        let eat = world
            .get::<Felinid>(felinid)
            .and_then(|f| f.eat_action_entity)
            .expect("eat action");

        assert!(perform_action(world, eat));

        assert_eq!(world.get::<Hunger>(felinid).map(|h| h.current), Some(150.0));
        assert!(world.get_entity(mouse).is_err());
        assert!(world.get_entity(eat).is_err());
        let state = world.get::<Felinid>(felinid).expect("felinid");
        assert!(state.eat_action_target.is_none());
        assert!(state.eat_action_entity.is_none());
        assert!(world.get::<Hands>(felinid).is_some_and(|h| h.active_hand_entity.is_none()));

        // Кашель снова доступен
        let action = world.get::<Action>(hairball).expect("hairball action");
        assert_eq!(action.charges, Some(1));
        assert!(action.is_usable());

        let eating = sounds(world)
            .into_iter()
            .filter(|s| s.path.starts_with("/Audio/Items/eating_"))
            .count();
        assert_eq!(eating, 1);
    }

    #[test]
    fn test_eat_when_overfed() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        world.entity_mut(felinid).insert(Hunger::new(200.0));
        let mouse = world.spawn(FelinidFood).id();
        equip_hand(world, felinid, mouse);
        let eat = world
            .get::<Felinid>(felinid)
            .and_then(|f| f.eat_action_entity)
            .expect("eat action");

        assert!(!perform_action(world, eat));

        assert!(world.get_entity(mouse).is_ok());
        assert_eq!(world.get::<Felinid>(felinid).and_then(|f| f.eat_action_target), Some(mouse));
        let popups = popups(world);
        assert_eq!(popups[0].key, "food-system-you-cannot-eat-any-more");
        assert_eq!(popups[0].kind, PopupKind::SmallCaution);
    }

    #[test]
    fn test_eat_blocked_by_mask() {
        let mut app = setup_app();
        let world = app.world_mut();
        let felinid = spawn_felinid(world);
        put_on_mask(world, felinid);
        let mouse = world.spawn(FelinidFood).id();
        equip_hand(world, felinid, mouse);
        let eat = world
            .get::<Felinid>(felinid)
            .and_then(|f| f.eat_action_entity)
            .expect("eat action");

        assert!(!perform_action(world, eat));

        assert_eq!(world.get::<Hunger>(felinid).map(|h| h.current), Some(100.0));
        assert!(world.get_entity(mouse).is_ok());
    }

    #[test]
    fn test_hairball_hit_nauseates() {
        let mut app = app_with_rng(Some(DeterministicRng::from_rng(StepRng::new(0, 0))));
        let world = app.world_mut();
        let hairball = world.spawn(Hairball::default()).id();
        let victim = world.spawn(StatusEffects).id();
        let felinid = world.spawn((Felinid::default(), StatusEffects)).id();
        let rock = world.spawn_empty().id();

        throw_hit(world, hairball, victim);
        throw_hit(world, hairball, felinid);
        throw_hit(world, hairball, rock);

        assert_eq!(nausea_count(world), 1);
    }

    #[test]
    fn test_hairball_hit_unlucky_roll() {
        let mut app = app_with_rng(Some(DeterministicRng::from_rng(StepRng::new(u64::MAX, 0))));
        let world = app.world_mut();
        let hairball = world.spawn(Hairball::default()).id();
        let victim = world.spawn(StatusEffects).id();

        throw_hit(world, hairball, victim);

        assert_eq!(nausea_count(world), 0);
    }

    #[test]
    fn test_hairball_pickup_nausea_cancels() {
        let mut app = app_with_rng(Some(DeterministicRng::from_rng(StepRng::new(0, 0))));
        let world = app.world_mut();
        let hairball = world.spawn(Hairball::default()).id();
        let victim = world.spawn((StatusEffects, Hands::default())).id();

        assert!(!try_pickup(world, victim, hairball));
        assert_eq!(nausea_count(world), 1);
        assert!(world.get::<Hands>(victim).is_some_and(|h| h.active_hand_entity.is_none()));
    }

    #[test]
    fn test_felinid_picks_up_hairball() {
        let mut app = app_with_rng(Some(DeterministicRng::from_rng(StepRng::new(0, 0))));
        let world = app.world_mut();
        let hairball = world.spawn(Hairball::default()).id();
        let felinid = world.spawn((Felinid::default(), StatusEffects, Hands::default())).id();

        assert!(try_pickup(world, felinid, hairball));
        assert_eq!(nausea_count(world), 0);
    }
}
