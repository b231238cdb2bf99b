// Per-tick driver for a set of frame sequencers

use super::sequencer::FrameSequencer;
use crate::engine::systems::System;
use anyhow::Result;

/// Advances every sequencer it owns once per engine tick
///
/// Acknowledges transition requests after reporting them; choosing which
/// sequence to switch to is left to whoever composes sequences.
#[derive(Debug, Default)]
pub struct SequenceSystem {
    sequencers: Vec<FrameSequencer>,
    transitions: u64,
    errors: u64,
}

impl SequenceSystem {
    pub fn new(sequencers: Vec<FrameSequencer>) -> Self {
        Self {
            sequencers,
            transitions: 0,
            errors: 0,
        }
    }

    pub fn add(&mut self, sequencer: FrameSequencer) {
        self.sequencers.push(sequencer);
    }

    pub fn get(&self, name: &str) -> Option<&FrameSequencer> {
        self.sequencers.iter().find(|s| s.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FrameSequencer> {
        self.sequencers.iter_mut().find(|s| s.name() == name)
    }

    pub fn sequencers(&self) -> &[FrameSequencer] {
        &self.sequencers
    }

    /// Start every sequencer
    pub fn play_all(&mut self) {
        for sequencer in &mut self.sequencers {
            sequencer.play();
        }
    }

    /// Transition requests seen so far
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Missing-frame errors seen so far
    pub fn error_count(&self) -> u64 {
        self.errors
    }
}

impl System for SequenceSystem {
    fn name(&self) -> &str {
        "sequence"
    }

    fn init(&mut self) -> Result<()> {
        for sequencer in &self.sequencers {
            if sequencer.frame_count() == 0 {
                log::warn!("Sequence {} has no frames", sequencer.name());
            }
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        for sequencer in &mut self.sequencers {
            if let Err(e) = sequencer.advance(dt) {
                self.errors += 1;
                log::warn!("{}", e);
            }

            if sequencer.take_transition_request() {
                self.transitions += 1;
                log::info!("Sequence {} finished, requesting default", sequencer.name());
            }
        }
    }

    fn render(&mut self) {
        for sequencer in &self.sequencers {
            if let Some(frame) = sequencer.current_frame() {
                log::trace!("{} -> {} ({}x{})", sequencer.name(), frame.name, frame.width, frame.height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::FrameCollection;
    use crate::game::animation::SequenceConfig;
    use std::sync::Arc;

    fn system() -> SequenceSystem {
        let run = FrameSequencer::new(
            Arc::new(FrameCollection::placeholder("Run_", 4)),
            SequenceConfig::looping("Run_", 0.1),
        );
        let jump = FrameSequencer::new(
            Arc::new(FrameCollection::placeholder("Jump_", 2)),
            SequenceConfig::one_shot("Jump_", 0.1),
        );
        SequenceSystem::new(vec![run, jump])
    }

    #[test]
    fn test_update_advances_running_sequencers() {
        let mut system = system();
        system.get_mut("Run_").unwrap().play();

        system.update(0.1);
        system.update(0.1);

        assert_eq!(system.get("Run_").unwrap().current_index(), 2);
        assert_eq!(system.get("Jump_").unwrap().current_index(), 0);
    }

    #[test]
    fn test_transition_requests_are_acknowledged() {
        let mut system = system();
        system.play_all();
        system.init().unwrap();

        system.update(0.1);
        system.update(0.1);

        assert_eq!(system.transition_count(), 1);
        assert!(!system.get("Jump_").unwrap().transition_requested());

        // Looping run never requests one
        for _ in 0..8 {
            system.update(0.1);
        }
        assert_eq!(system.transition_count(), 5);
    }

    #[test]
    fn test_missing_frames_are_counted() {
        let short = FrameSequencer::new(
            Arc::new(FrameCollection::placeholder("Duck_", 1)),
            SequenceConfig::looping("Duck_", 0.1).with_frame_count(2),
        );
        let mut system = SequenceSystem::default();
        system.add(short);
        system.play_all();

        system.update(0.1);
        system.update(0.1);
        system.render();

        assert_eq!(system.error_count(), 1);
        assert_eq!(system.sequencers().len(), 1);
    }
}
