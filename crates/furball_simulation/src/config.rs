//! Runtime конфигурация подсистем (felinid + pseudo-item)
//!
//! Значения по умолчанию позволяют запускать симуляцию из коробки.
//! Хост может подменить resource до `SimulationPlugin` или загрузить из JSON.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Конфиг furball-подсистем
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurballConfig {
    /// Задержка между кашлем и появлением hairball (секунды)
    pub cough_up_time: f32,
    /// Сколько units переливаем из bloodstream в hairball
    pub hairball_transfer_volume: f32,
    /// Шанс тошноты от hairball (hit / pickup)
    pub nausea_chance: f32,
    /// Насыщение от съеденной мыши
    pub eat_hunger_gain: f32,
    /// Длительность do-after "засунуть другого в сумку" (секунды)
    pub insert_other_delay: f32,
    /// Смещение user, после которого do-after с break_on_move отменяется
    pub do_after_move_threshold: f32,
}

impl Default for FurballConfig {
    fn default() -> Self {
        Self {
            cough_up_time: 2.15,
            hairball_transfer_volume: 20.0,
            nausea_chance: 0.2,
            eat_hunger_gain: 50.0,
            insert_other_delay: 5.0,
            do_after_move_threshold: 0.1,
        }
    }
}

impl FurballConfig {
    /// Парсит конфиг из JSON (отсутствующие поля → default)
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
