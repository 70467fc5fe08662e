//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Hunger, StatusEffects)
//! - felinid: hairball/eat-mouse способности (Felinid, CoughingUpHairball, Hairball, FelinidFood)
//! - pseudo_item: "живой предмет" в сумке (PseudoItem, Item)
//! - equipment: руки и слоты одежды (Hands, InventorySlots, IngestionBlocker)
//! - chemistry: растворы (Solution, SolutionContainer, Bloodstream)
//! - world: spatial parent (AttachedTo)

pub mod actor;
pub mod chemistry;
pub mod equipment;
pub mod felinid;
pub mod pseudo_item;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use chemistry::*;
pub use equipment::*;
pub use felinid::*;
pub use pseudo_item::*;
pub use world::*;
