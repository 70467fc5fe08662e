//! Hairball side effects: тошнота от попадания и от попытки поднять

use bevy::prelude::*;

use crate::components::{Felinid, Hairball, StatusEffects};
use crate::config::FurballConfig;
use crate::interaction::{GettingPickedUpAttempt, NauseaTriggered, ThrowDoHit};
use crate::DeterministicRng;

/// Кого может стошнить: не felinid (иммунитет) и есть status effects
fn can_get_nauseous(
    entity: Entity,
    felinids: &Query<(), With<Felinid>>,
    status: &Query<(), With<StatusEffects>>,
) -> bool {
    !felinids.contains(entity) && status.contains(entity)
}

/// Бросок шанса тошноты. true — стошнило
fn roll_nausea(
    entity: Entity,
    rng: &mut DeterministicRng,
    config: &FurballConfig,
    nausea: &mut EventWriter<NauseaTriggered>,
) -> bool {
    if !rng.prob(config.nausea_chance) {
        return false;
    }

    nausea.write(NauseaTriggered { entity });
    crate::log(&format!("🤢 {:?} got nauseous from a hairball", entity));
    true
}

/// Hairball попал в кого-то
pub fn on_hairball_hit(
    trigger: Trigger<ThrowDoHit>,
    hairballs: Query<(), With<Hairball>>,
    felinids: Query<(), With<Felinid>>,
    status: Query<(), With<StatusEffects>>,
    mut rng: ResMut<DeterministicRng>,
    config: Res<FurballConfig>,
    mut nausea: EventWriter<NauseaTriggered>,
) {
    if !hairballs.contains(trigger.target()) {
        return;
    }

    let struck = trigger.event().target;
    if !can_get_nauseous(struck, &felinids, &status) {
        return;
    }

    roll_nausea(struck, &mut rng, &config, &mut nausea);
}

/// Кто-то тянется к hairball: при тошноте pickup отменяется
pub fn on_hairball_pickup_attempt(
    mut trigger: Trigger<GettingPickedUpAttempt>,
    hairballs: Query<(), With<Hairball>>,
    felinids: Query<(), With<Felinid>>,
    status: Query<(), With<StatusEffects>>,
    mut rng: ResMut<DeterministicRng>,
    config: Res<FurballConfig>,
    mut nausea: EventWriter<NauseaTriggered>,
) {
    if !hairballs.contains(trigger.target()) {
        return;
    }

    let user = trigger.event().user;
    if !can_get_nauseous(user, &felinids, &status) {
        return;
    }

    if roll_nausea(user, &mut rng, &config, &mut nausea) {
        trigger.event_mut().cancel();
    }
}
