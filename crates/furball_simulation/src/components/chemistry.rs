//! Chemistry компоненты: Solution, SolutionContainer, Bloodstream
//!
//! Минимальная модель жидкостей: реагент → объём. Смешивание/реакции не моделируем,
//! нужны только split из источника и add в приёмник.

use bevy::prelude::*;
use std::collections::HashMap;

/// Раствор: набор реагентов с объёмами
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct Solution {
    /// (reagent id, volume)
    pub reagents: Vec<(String, f32)>,
    /// Максимальный объём (None = без ограничения)
    pub max_volume: Option<f32>,
}

impl Solution {
    pub fn with_capacity(max_volume: f32) -> Self {
        Self {
            reagents: Vec::new(),
            max_volume: Some(max_volume),
        }
    }

    pub fn with_reagent(mut self, reagent: impl Into<String>, volume: f32) -> Self {
        self.add_reagent(reagent, volume);
        self
    }

    /// Суммарный объём
    pub fn volume(&self) -> f32 {
        self.reagents.iter().map(|(_, v)| *v).sum()
    }

    pub fn reagent_volume(&self, reagent: &str) -> f32 {
        self.reagents
            .iter()
            .filter(|(id, _)| id == reagent)
            .map(|(_, v)| *v)
            .sum()
    }

    fn add_reagent(&mut self, reagent: impl Into<String>, volume: f32) {
        if volume <= 0.0 {
            return;
        }
        let reagent = reagent.into();
        match self.reagents.iter_mut().find(|(id, _)| *id == reagent) {
            Some((_, existing)) => *existing += volume,
            None => self.reagents.push((reagent, volume)),
        }
    }

    /// Отделить до `quantity` units (пропорционально по реагентам)
    ///
    /// Если в растворе меньше — отдаём всё что есть (в том числе 0).
    pub fn split(&mut self, quantity: f32) -> Solution {
        let total = self.volume();
        let taken = quantity.clamp(0.0, total);
        let mut portion = Solution::default();

        if taken <= 0.0 {
            return portion;
        }

        let ratio = taken / total;
        for (id, volume) in self.reagents.iter_mut() {
            let part = *volume * ratio;
            *volume -= part;
            portion.add_reagent(id.clone(), part);
        }
        self.reagents.retain(|(_, v)| *v > f32::EPSILON);

        portion
    }

    /// Добавить раствор. Если не влезает — вернуть его обратно (Err)
    pub fn try_add(&mut self, other: Solution) -> Result<(), Solution> {
        if let Some(max) = self.max_volume {
            if self.volume() + other.volume() > max + f32::EPSILON {
                return Err(other);
            }
        }
        for (id, volume) in other.reagents {
            self.add_reagent(id, volume);
        }
        Ok(())
    }
}

/// Именованные растворы entity ("chemicals", "hairball", ...)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SolutionContainer {
    pub solutions: HashMap<String, Solution>,
}

impl SolutionContainer {
    pub fn with_solution(mut self, name: impl Into<String>, solution: Solution) -> Self {
        self.solutions.insert(name.into(), solution);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Solution> {
        self.solutions.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Solution> {
        self.solutions.get_mut(name)
    }
}

/// Кровоток: имя внутреннего раствора с химикатами
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Bloodstream {
    pub chemical_solution_name: String,
}

impl Default for Bloodstream {
    fn default() -> Self {
        Self {
            chemical_solution_name: "chemicals".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bounded() {
        let mut source = Solution::default().with_reagent("Water", 30.0).with_reagent("Nutriment", 10.0);

        let portion = source.split(20.0);

        assert_eq!(portion.volume(), 20.0);
        assert_eq!(portion.reagent_volume("Water"), 15.0);
        assert_eq!(portion.reagent_volume("Nutriment"), 5.0);
        assert_eq!(source.volume(), 20.0);
    }

    #[test]
    fn test_split_clamped_to_available() {
        let mut source = Solution::default().with_reagent("Water", 7.0);

        let portion = source.split(20.0);

        assert_eq!(portion.volume(), 7.0);
        assert_eq!(source.volume(), 0.0);

        // Пустой источник → пустая порция, без паники
        assert_eq!(source.split(20.0).volume(), 0.0);
    }

    #[test]
    fn test_try_add_respects_capacity() {
        let mut sink = Solution::with_capacity(10.0);

        assert!(sink.try_add(Solution::default().with_reagent("Water", 8.0)).is_ok());
        let rejected = sink.try_add(Solution::default().with_reagent("Water", 5.0));

        assert!(rejected.is_err());
        assert_eq!(sink.volume(), 8.0);
    }
}
