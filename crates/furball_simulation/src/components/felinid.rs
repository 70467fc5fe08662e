//! Felinid компоненты: Felinid, CoughingUpHairball, Hairball, FelinidFood
//!
//! Только данные. Поведение — в `crate::felinid` (observers + FixedUpdate sweep).

use bevy::prelude::*;
use crate::actions::ActionId;
use crate::prototypes::PrototypeId;

/// Felinid — актор с hairball/eat-mouse способностями
///
/// Инвариант: `eat_action_entity.is_some() == eat_action_target.is_some()`
///
/// Lifecycle:
/// - `hairball_action_entity` заполняется один раз на MapInit
/// - `eat_action_entity` + `eat_action_target` — на equip FelinidFood в руку,
///   очищаются на unequip или после съедения
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Felinid {
    /// Прототип hairball для spawn
    pub hairball_prototype: PrototypeId,

    /// Action id кашля (None → способность не выдаётся)
    pub hairball_action: Option<ActionId>,
    /// Handle выданного hairball action
    pub hairball_action_entity: Option<Entity>,

    /// Action id "съесть мышь"
    pub eat_action: Option<ActionId>,
    /// Handle выданного eat action
    pub eat_action_entity: Option<Entity>,
    /// Что именно съедаем (еда в руке)
    pub eat_action_target: Option<Entity>,
}

impl Default for Felinid {
    fn default() -> Self {
        Self {
            hairball_prototype: PrototypeId::from("Hairball"),
            hairball_action: None,
            hairball_action_entity: None,
            eat_action: None,
            eat_action_entity: None,
            eat_action_target: None,
        }
    }
}

impl Felinid {
    /// Felinid с обеими стандартными способностями
    pub fn with_default_actions() -> Self {
        Self {
            hairball_action: Some(ActionId::from(crate::actions::HAIRBALL_ACTION)),
            eat_action: Some(ActionId::from(crate::actions::EAT_MOUSE_ACTION)),
            ..Default::default()
        }
    }

    /// Сбросить eat-связку (target + handle), вернуть старый handle
    pub fn take_eat_action(&mut self) -> Option<Entity> {
        self.eat_action_target = None;
        self.eat_action_entity.take()
    }
}

/// Отложенный hairball: накапливаем время до `cough_up_time`
///
/// Transient компонент. Максимум один на entity (повторный кашель не сбрасывает активный).
/// Удаляется после того как sweep заспавнил hairball.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CoughingUpHairball {
    /// Накопленное время (секунды)
    pub accumulator: f32,
    /// Порог срабатывания (секунды)
    pub cough_up_time: f32,
}

impl CoughingUpHairball {
    pub fn new(cough_up_time: f32) -> Self {
        Self {
            accumulator: 0.0,
            cough_up_time,
        }
    }

    /// Накопить delta, вернуть true если порог достигнут
    pub fn tick(&mut self, delta: f32) -> bool {
        self.accumulator += delta;
        self.accumulator >= self.cough_up_time
    }
}

/// Hairball — заспавненный побочный продукт кашля
///
/// Жидкость лежит в `SolutionContainer` под именем `solution_name`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Hairball {
    pub solution_name: String,
}

impl Default for Hairball {
    fn default() -> Self {
        Self {
            solution_name: "hairball".to_string(),
        }
    }
}

/// Маркер: еда, которую felinid может съесть (мышь)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FelinidFood;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coughing_up_tick() {
        let mut coughing = CoughingUpHairball::new(1.0);

        assert!(!coughing.tick(0.5));
        assert!(!coughing.tick(0.25));
        assert!(coughing.tick(0.25)); // ровно 1.0 → срабатывает
        assert_eq!(coughing.accumulator, 1.0);
    }

    #[test]
    fn test_take_eat_action_clears_both() {
        let mut felinid = Felinid::with_default_actions();
        felinid.eat_action_target = Some(Entity::PLACEHOLDER);
        felinid.eat_action_entity = Some(Entity::PLACEHOLDER);

        assert_eq!(felinid.take_eat_action(), Some(Entity::PLACEHOLDER));
        assert!(felinid.eat_action_target.is_none());
        assert!(felinid.eat_action_entity.is_none());

        // Повторно — ничего
        assert_eq!(felinid.take_eat_action(), None);
    }
}
