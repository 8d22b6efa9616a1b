// Engine layer: sprites, textures, animation, audio, entity storage

pub mod animation;
pub mod audio;
pub mod scene;
pub mod sprite;
pub mod texture;
