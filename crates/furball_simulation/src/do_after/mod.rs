//! Do-after — отложенное действие с условиями отмены
//!
//! # Architecture
//!
//! ```text
//! start_do_after(world, args, payload)
//!   ↓ spawn DoAfter entity (запоминаем позицию user + содержимое руки)
//! update_do_afters (FixedUpdate, каждый тик)
//!   ↓ cancel predicates: user/target исчез, user сдвинулся, рука сменилась
//!   ↓ elapsed += dt, elapsed ≥ delay → завершение
//! DoAfterEvent { cancelled } на args.target → observer подсистемы
//! ```
//!
//! Кооперативная модель: ничего не блокирует, ожидание = повторный вход через событие.

use bevy::prelude::*;

use crate::components::Hands;
use crate::config::FurballConfig;

/// Что делать по завершении (какая подсистема обработает DoAfterEvent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DoAfterPayload {
    PseudoItemInsert,
}

/// Параметры do-after
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DoAfterArgs {
    /// Кто выполняет
    pub user: Entity,
    /// Длительность (секунды)
    pub delay: f32,
    /// На ком поднимается DoAfterEvent
    pub target: Entity,
    /// Инструмент (сумка в руке и т.п.)
    pub used: Option<Entity>,
    /// Отмена, если user сдвинулся
    pub break_on_move: bool,
    /// Отмена, если содержимое активной руки изменилось (или рук нет)
    pub need_hand: bool,
}

/// Активный do-after (отдельная entity)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DoAfter {
    pub args: DoAfterArgs,
    pub payload: DoAfterPayload,
    pub elapsed: f32,
    pub start_position: Option<Vec3>,
    pub start_hand: Option<Entity>,
}

/// Do-after завершён или отменён (raised on `args.target`)
#[derive(Event, Debug, Clone, Copy)]
pub struct DoAfterEvent {
    pub payload: DoAfterPayload,
    pub args: DoAfterArgs,
    pub cancelled: bool,
    pub handled: bool,
}

/// Запустить do-after. None — user не может (нет рук при need_hand)
pub fn start_do_after(world: &mut World, args: DoAfterArgs, payload: DoAfterPayload) -> Option<Entity> {
    let start_position = world.get::<Transform>(args.user).map(|t| t.translation);
    let hands = world.get::<Hands>(args.user);

    if args.need_hand && hands.is_none() {
        crate::log_warning(&format!("DoAfter: {:?} needs hands to start {:?}", args.user, payload));
        return None;
    }
    let start_hand = hands.and_then(|h| h.active_hand_entity);

    let id = world
        .spawn(DoAfter {
            args,
            payload,
            elapsed: 0.0,
            start_position,
            start_hand,
        })
        .id();

    crate::log(&format!(
        "DoAfter {:?} started: {:?} by {:?} ({:.1}s)",
        id, payload, args.user, args.delay
    ));
    Some(id)
}

/// Причина отмены
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoAfterCancel {
    UserGone,
    TargetGone,
    Moved,
    HandChanged,
}

impl DoAfter {
    /// Проверить cancel predicates
    pub fn check_cancel(
        &self,
        user_position: Option<Vec3>,
        user_hands: Option<&Hands>,
        target_exists: bool,
        move_threshold: f32,
    ) -> Option<DoAfterCancel> {
        if !target_exists {
            return Some(DoAfterCancel::TargetGone);
        }

        if self.args.break_on_move {
            match (self.start_position, user_position) {
                (Some(start), Some(now)) if start.distance(now) > move_threshold => {
                    return Some(DoAfterCancel::Moved);
                }
                (Some(_), None) => return Some(DoAfterCancel::UserGone),
                _ => {}
            }
        }

        if self.args.need_hand {
            let Some(hands) = user_hands else {
                return Some(DoAfterCancel::UserGone);
            };
            if hands.active_hand_entity != self.start_hand {
                return Some(DoAfterCancel::HandChanged);
            }
        }

        None
    }
}

/// System: tick всех do-after, отмена/завершение
pub fn update_do_afters(
    mut commands: Commands,
    mut do_afters: Query<(Entity, &mut DoAfter)>,
    transforms: Query<&Transform>,
    hands: Query<&Hands>,
    exists: Query<()>,
    time: Res<Time<Fixed>>,
    config: Res<FurballConfig>,
) {
    let delta = time.delta_secs();

    for (id, mut do_after) in do_afters.iter_mut() {
        let user = do_after.args.user;
        let target = do_after.args.target;

        if !exists.contains(user) {
            // Некому сообщать о завершении, просто убираем
            commands.entity(id).despawn();
            continue;
        }

        let cancel = do_after.check_cancel(
            transforms.get(user).ok().map(|t| t.translation),
            hands.get(user).ok(),
            exists.contains(target),
            config.do_after_move_threshold,
        );

        if let Some(reason) = cancel {
            crate::log(&format!("DoAfter {:?} cancelled: {:?}", id, reason));
            if reason != DoAfterCancel::TargetGone {
                commands.trigger_targets(
                    DoAfterEvent {
                        payload: do_after.payload,
                        args: do_after.args,
                        cancelled: true,
                        handled: false,
                    },
                    target,
                );
            }
            commands.entity(id).despawn();
            continue;
        }

        do_after.elapsed += delta;
        if do_after.elapsed < do_after.args.delay {
            continue;
        }

        commands.trigger_targets(
            DoAfterEvent {
                payload: do_after.payload,
                args: do_after.args,
                cancelled: false,
                handled: false,
            },
            target,
        );
        commands.entity(id).despawn();
    }
}

/// Do-after plugin
pub struct DoAfterPlugin;

impl Plugin for DoAfterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, update_do_afters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn do_after(break_on_move: bool, need_hand: bool, start_hand: Option<Entity>) -> DoAfter {
        DoAfter {
            args: DoAfterArgs {
                user: Entity::PLACEHOLDER,
                delay: 5.0,
                target: Entity::PLACEHOLDER,
                used: None,
                break_on_move,
                need_hand,
            },
            payload: DoAfterPayload::PseudoItemInsert,
            elapsed: 0.0,
            start_position: Some(Vec3::ZERO),
            start_hand,
        }
    }

    #[test]
    fn test_no_cancel_when_still() {
        let d = do_after(true, false, None);
        assert_eq!(d.check_cancel(Some(Vec3::new(0.05, 0.0, 0.0)), None, true, 0.1), None);
    }

    #[test]
    fn test_cancel_on_move() {
        let d = do_after(true, false, None);
        assert_eq!(
            d.check_cancel(Some(Vec3::new(1.0, 0.0, 0.0)), None, true, 0.1),
            Some(DoAfterCancel::Moved)
        );
    }

    #[test]
    fn test_cancel_on_hand_change() {
        let bag = Entity::from_raw(7);
        let d = do_after(false, true, Some(bag));

        assert_eq!(d.check_cancel(None, Some(&Hands::holding(bag)), true, 0.1), None);
        assert_eq!(
            d.check_cancel(None, Some(&Hands::default()), true, 0.1),
            Some(DoAfterCancel::HandChanged)
        );
    }

    #[test]
    fn test_cancel_when_target_gone() {
        let d = do_after(false, false, None);
        assert_eq!(d.check_cancel(None, None, false, 0.1), Some(DoAfterCancel::TargetGone));
    }
}
