// Game layer: combat rules, entities, formations, and the stage

pub mod collision;
pub mod combat;
pub mod entities;
pub mod events;
pub mod formation;
pub mod shooter;
pub mod stage;
pub mod team;
