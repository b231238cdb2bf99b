// Game-side modules

pub mod animation;
