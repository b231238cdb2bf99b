// Engine modules: frame assets, tick clock, system scheduling

pub mod assets;
pub mod game_loop;
pub mod systems;
