use anyhow::{Context, Result};
use log::info;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod engine;
mod game;

use engine::game_loop::GameLoop;
use engine::systems::{Engine, EngineEvent, System};
use game::animation::{AnimationManifest, SequenceSystem};

const DEFAULT_MANIFEST: &str = "assets/animations.toml";

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting sprite sequencer...");

    let manifest_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_MANIFEST.to_string());
    let manifest = AnimationManifest::load_from_file(&manifest_path)
        .with_context(|| format!("loading {manifest_path}"))?;

    let mut library = manifest.library();
    let mut sequences = SequenceSystem::new(manifest.build_sequencers(&mut library)?);
    sequences.play_all();
    info!("Loaded {:?}", library.stats());

    let systems: Vec<Box<dyn System>> = vec![Box::new(sequences)];
    let mut engine = Engine::new(systems);
    engine.initialize()?;
    let mut clock = GameLoop::new();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Sprite Sequencer")
        .with_inner_size(winit::dpi::LogicalSize::new(640, 480))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                engine.handle_event(EngineEvent::Shutdown);
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                engine.render();
            }
            Event::AboutToWait => {
                if !engine.is_running() {
                    elwt.exit();
                    return;
                }

                for _ in 0..clock.begin_frame() {
                    engine.update(clock.fixed_timestep());
                }
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
