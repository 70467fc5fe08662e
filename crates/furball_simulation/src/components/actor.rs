//! Базовые компоненты акторов: Hunger, StatusEffects

use bevy::prelude::*;

/// Пороги голода (от сытого к мёртвому)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum HungerThreshold {
    Overfed,
    Okay,
    Peckish,
    Starving,
    Dead,
}

/// Голод актора
///
/// Инвариант: dead_threshold ≤ current ≤ overfed_threshold
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hunger {
    pub current: f32,
    pub overfed_threshold: f32,
    pub okay_threshold: f32,
    pub peckish_threshold: f32,
    pub starving_threshold: f32,
    pub dead_threshold: f32,
}

impl Default for Hunger {
    fn default() -> Self {
        Self::new(150.0)
    }
}

impl Hunger {
    pub fn new(current: f32) -> Self {
        let mut hunger = Self {
            current: 0.0,
            overfed_threshold: 200.0,
            okay_threshold: 150.0,
            peckish_threshold: 100.0,
            starving_threshold: 50.0,
            dead_threshold: 0.0,
        };
        hunger.set(current);
        hunger
    }

    /// Текущий порог: наибольший, значение которого ≤ current
    pub fn current_threshold(&self) -> HungerThreshold {
        if self.current >= self.overfed_threshold {
            HungerThreshold::Overfed
        } else if self.current >= self.okay_threshold {
            HungerThreshold::Okay
        } else if self.current >= self.peckish_threshold {
            HungerThreshold::Peckish
        } else if self.current > self.dead_threshold {
            HungerThreshold::Starving
        } else {
            HungerThreshold::Dead
        }
    }

    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(self.dead_threshold, self.overfed_threshold);
    }

    /// Изменить сытость на delta (clamp по порогам)
    pub fn modify(&mut self, delta: f32) {
        self.set(self.current + delta);
    }
}

/// Маркер: entity подвержена статус-эффектам (в том числе тошноте)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct StatusEffects;
