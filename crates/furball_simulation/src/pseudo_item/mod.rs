//! Pseudo-item module — entity прячется в storage как обычный предмет
//!
//! # Architecture
//!
//! ```text
//! Free (active=false)
//!   ↓ try_insert ok (self-insert verb / do-after insert-other)
//! Disguised (active=true, Item выдан, AttachedTo снят)
//!   ↓ EntRemovedFromContainer (любая причина)
//! Free (Item отозван)
//! ```
//!
//! **Guards пока Disguised:**
//! - `GettingPickedUpAttempt` чужим актором → re-anchor + cancel
//! - `DropAttempt` → cancel всегда
//!
//! **Verbs:**
//! - Innate "insert self" (на user с PseudoItem) — синхронно
//! - Alternative "insert other" (на target с PseudoItem) — do-after 5s

use bevy::prelude::*;

pub mod systems;


pub use systems::*;

/// Pseudo-item plugin
pub struct PseudoItemPlugin;

impl Plugin for PseudoItemPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(add_insert_verb)
            .add_observer(add_insert_alt_verb)
            .add_observer(on_ent_removed)
            .add_observer(on_getting_picked_up_attempt)
            .add_observer(on_drop_attempt)
            .add_observer(on_do_after);
    }
}
