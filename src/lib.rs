// Simulation core for a 2D fixed-shooter: pixel-accurate collision,
// animation-driven entity lifecycles, and the stage session that ties
// them together. Rendering, input, and audio backends plug in on top.

pub mod core;
pub mod engine;
pub mod game;
