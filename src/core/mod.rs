// Core utilities: math helpers and frame timing

pub mod math;
pub mod time;
