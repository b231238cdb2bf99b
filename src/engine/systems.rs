// Engine system scheduling
//
// The caller hands the engine an explicit list of systems; each tick they are
// updated in order and each update is timed.

use anyhow::Result;
use std::time::Instant;

/// Something the engine updates and renders once per tick
pub trait System {
    /// Name used in logs and timing reports
    fn name(&self) -> &str;

    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn update(&mut self, dt: f32);

    fn render(&mut self) {}
}

/// Events that change the engine's run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    Shutdown,
}

/// How long one system's last update took
#[derive(Debug, Clone, PartialEq)]
pub struct SystemTiming {
    pub name: String,
    pub millis: f32,
}

/// Owns and drives the systems of a running game
pub struct Engine {
    systems: Vec<Box<dyn System>>,
    timings: Vec<SystemTiming>,
    running: bool,
}

impl Engine {
    pub fn new(systems: Vec<Box<dyn System>>) -> Self {
        Self {
            timings: Vec::with_capacity(systems.len()),
            systems,
            running: true,
        }
    }

    /// Initialize all systems in registration order
    pub fn initialize(&mut self) -> Result<()> {
        for system in &mut self.systems {
            system.init()?;
            log::debug!("Initialized {} system", system.name());
        }
        log::info!("Engine initialized with {} systems", self.systems.len());
        Ok(())
    }

    /// Update all systems, recording how long each took
    pub fn update(&mut self, dt: f32) {
        self.timings.clear();
        for system in &mut self.systems {
            let start = Instant::now();
            system.update(dt);
            let millis = start.elapsed().as_secs_f32() * 1000.0;

            log::trace!("{} system: {:.3} ms", system.name(), millis);
            self.timings.push(SystemTiming {
                name: system.name().to_string(),
                millis,
            });
        }
    }

    pub fn render(&mut self) {
        for system in &mut self.systems {
            system.render();
        }
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Shutdown => self.stop_running(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop_running(&mut self) {
        if self.running {
            self.running = false;
            log::info!("Engine stopping");
        }
    }

    /// Per-system timings from the last update
    pub fn timings(&self) -> &[SystemTiming] {
        &self.timings
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn init(&mut self) -> Result<()> {
            self.log.borrow_mut().push(format!("{} init", self.name));
            Ok(())
        }

        fn update(&mut self, dt: f32) {
            self.log.borrow_mut().push(format!("{} update {}", self.name, dt));
        }

        fn render(&mut self) {
            self.log.borrow_mut().push(format!("{} render", self.name));
        }
    }

    struct Failing;

    impl System for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn init(&mut self) -> Result<()> {
            anyhow::bail!("no frames")
        }

        fn update(&mut self, _dt: f32) {}
    }

    fn engine_with_log() -> (Engine, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let systems: Vec<Box<dyn System>> = vec![
            Box::new(Recorder {
                name: "animation",
                log: Rc::clone(&log),
            }),
            Box::new(Recorder {
                name: "sprites",
                log: Rc::clone(&log),
            }),
        ];
        (Engine::new(systems), log)
    }

    #[test]
    fn test_systems_run_in_order() {
        let (mut engine, log) = engine_with_log();
        engine.initialize().unwrap();
        engine.update(0.5);
        engine.render();

        assert_eq!(
            *log.borrow(),
            vec![
                "animation init",
                "sprites init",
                "animation update 0.5",
                "sprites update 0.5",
                "animation render",
                "sprites render",
            ]
        );
    }

    #[test]
    fn test_update_records_timings() {
        let (mut engine, _log) = engine_with_log();
        assert!(engine.timings().is_empty());

        engine.update(0.1);
        engine.update(0.1);

        let names: Vec<&str> = engine.timings().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["animation", "sprites"]);
        assert!(engine.timings().iter().all(|t| t.millis >= 0.0));
    }

    #[test]
    fn test_shutdown_event_stops_engine() {
        let (mut engine, _log) = engine_with_log();
        assert!(engine.is_running());

        engine.handle_event(EngineEvent::Shutdown);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_init_failure_propagates() {
        let systems: Vec<Box<dyn System>> = vec![Box::new(Failing)];
        let mut engine = Engine::new(systems);
        assert!(engine.initialize().is_err());
        assert_eq!(engine.system_count(), 1);
    }
}
