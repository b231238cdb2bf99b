// Frame sequencer: decides which frame of one sequence is displayed each tick

use super::SequenceError;
use crate::engine::assets::{Frame, FrameCollection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a sequence behaves when it reaches the end of its frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    /// Base animation (idle/run). Wraps back to frame 0 forever and never
    /// asks its owner to switch away.
    Looping,
    /// Plays a cycle, then raises a transition request so the owner can go
    /// back to its looping sequence.
    #[default]
    OneShot,
}

/// Construction parameters for a [`FrameSequencer`]
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceConfig {
    /// Name of the sequence (e.g. "Run_", "Jump_")
    pub name: String,
    /// Frames in the cycle; defaults to the number of loaded frames
    pub frame_count: Option<usize>,
    /// Seconds each frame is displayed
    pub frame_duration: f32,
    /// Countdown before the first advance; defaults to `frame_duration`
    pub initial_delay: Option<f32>,
    pub kind: SequenceKind,
    /// Caller-interpreted intent flag, not read by the advance logic
    pub looping: bool,
}

impl SequenceConfig {
    pub fn new(name: &str, frame_duration: f32, kind: SequenceKind) -> Self {
        Self {
            name: name.to_string(),
            frame_count: None,
            frame_duration,
            initial_delay: None,
            kind,
            looping: kind == SequenceKind::Looping,
        }
    }

    /// Config for the base sequence that runs indefinitely
    pub fn looping(name: &str, frame_duration: f32) -> Self {
        Self::new(name, frame_duration, SequenceKind::Looping)
    }

    /// Config for a sequence that signals its owner after one cycle
    pub fn one_shot(name: &str, frame_duration: f32) -> Self {
        Self::new(name, frame_duration, SequenceKind::OneShot)
    }

    pub fn with_frame_count(mut self, frame_count: usize) -> Self {
        self.frame_count = Some(frame_count);
        self
    }

    pub fn with_initial_delay(mut self, delay: f32) -> Self {
        self.initial_delay = Some(delay);
        self
    }
}

/// What a call to [`FrameSequencer::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running, nothing changed
    Stopped,
    /// Still counting down the current frame
    Waiting,
    /// Frame boundary reached but the hold frame is active
    Held,
    /// Moved to the next frame
    Advanced,
    /// A one-shot cycle finished; index reset and transition requested
    CycleComplete,
    /// Index wrapped back to 0 without a transition request
    Wrapped,
}

/// Playback state of one frame sequence
///
/// Driven once per tick by its owner through [`advance`](Self::advance). The
/// frames are shared read-only with the loader and any other sequencer using
/// the same collection.
#[derive(Debug, Clone)]
pub struct FrameSequencer {
    frames: Arc<FrameCollection>,
    name: String,
    path: String,
    kind: SequenceKind,
    frame_count: usize,
    frame_duration: f32,
    /// Countdown to the next frame boundary
    frame_delay: f32,
    current_index: usize,
    /// Frame currently selected for display
    selected: Option<usize>,
    hold_frame: Option<usize>,
    running: bool,
    looping: bool,
    done: bool,
    transition_requested: bool,
}

impl FrameSequencer {
    /// Create a stopped sequencer over a loaded frame collection
    pub fn new(frames: Arc<FrameCollection>, config: SequenceConfig) -> Self {
        let frame_count = config.frame_count.unwrap_or(frames.len());
        if frame_count == 0 {
            log::warn!("Sequence {} created with zero frames", config.name);
        } else if frame_count > frames.len() {
            log::warn!(
                "Sequence {} expects {} frames but only {} are loaded",
                config.name,
                frame_count,
                frames.len()
            );
        }

        Self {
            path: frames.folder().to_string(),
            frames,
            name: config.name,
            kind: config.kind,
            frame_count,
            frame_duration: config.frame_duration,
            frame_delay: config.initial_delay.unwrap_or(config.frame_duration),
            current_index: 0,
            selected: None,
            hold_frame: None,
            running: false,
            looping: config.looping,
            done: false,
            transition_requested: false,
        }
    }

    /// Start or resume playback
    ///
    /// Position and countdown are left where they are; use
    /// [`restart`](Self::restart) to play from frame 0.
    pub fn play(&mut self) {
        self.running = true;
        self.done = false;
    }

    /// Reset to frame 0 with a full frame countdown, then play
    pub fn restart(&mut self) {
        self.current_index = 0;
        self.frame_delay = self.frame_duration;
        self.play();
    }

    /// Stop playback; takes effect on the next `advance`
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Progress playback by `dt` seconds
    ///
    /// A missing frame resource is returned as an error, but the sequencer has
    /// already moved on to a consistent state by then: the countdown is reset
    /// and the index advanced as if the frame had been shown.
    pub fn advance(&mut self, dt: f32) -> Result<Tick, SequenceError> {
        if !self.running {
            return Ok(Tick::Stopped);
        }

        let dt = if dt >= 0.0 {
            dt
        } else {
            log::warn!("Sequence {} got invalid dt {}, using 0", self.name, dt);
            0.0
        };

        self.frame_delay -= dt;
        if self.frame_delay > 0.0 {
            return Ok(Tick::Waiting);
        }

        if self.frame_count == 0 {
            log::warn!("Sequence {} has no frames to advance through", self.name);
            self.frame_delay = self.frame_duration;
            self.current_index = 0;
            return Ok(Tick::Waiting);
        }

        let mut tick = Tick::Held;
        let mut selection = Ok(());
        if !self.is_held() {
            if self.current_index == self.frame_count {
                // Released from a hold on the end of the cycle
                self.frame_delay = self.frame_duration;
            } else {
                selection = self.advance_frame();
                self.current_index = self.current_index.saturating_add(1);
                tick = Tick::Advanced;
            }
        }

        // A hold on `frame_count` keeps the cycle open
        if self.current_index == self.frame_count && !self.is_held() {
            self.current_index = 0;
            tick = match self.kind {
                SequenceKind::OneShot => {
                    log::debug!("Sequence {} completed a cycle", self.name);
                    self.transition_requested = true;
                    Tick::CycleComplete
                }
                SequenceKind::Looping => Tick::Wrapped,
            };
        } else if self.current_index > self.frame_count {
            self.current_index = 0;
            tick = Tick::Wrapped;
        }

        selection.map(|()| tick)
    }

    /// Select the frame at the current index for display and restart the countdown
    ///
    /// Does not move the index; `advance` does that after calling this.
    pub fn advance_frame(&mut self) -> Result<(), SequenceError> {
        self.frame_delay = self.frame_duration;

        if self.frames.get(self.current_index).is_none() {
            return Err(SequenceError::MissingFrame {
                sequence: self.name.clone(),
                index: self.current_index,
                available: self.frames.len(),
            });
        }

        self.selected = Some(self.current_index);
        log::trace!("Sequence {} showing frame {}", self.name, self.current_index);
        Ok(())
    }

    /// Read and clear the transition request
    pub fn take_transition_request(&mut self) -> bool {
        std::mem::take(&mut self.transition_requested)
    }

    /// Whether the hold frame is active at the current index
    pub fn is_held(&self) -> bool {
        self.hold_frame == Some(self.current_index)
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn frame_delay(&self) -> f32 {
        self.frame_delay
    }

    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder the frames were loaded from
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    pub fn hold_frame(&self) -> Option<usize> {
        self.hold_frame
    }

    /// Whether a one-shot cycle finished and the owner has not acknowledged it
    pub fn transition_requested(&self) -> bool {
        self.transition_requested
    }

    /// Index of the frame selected for display, if any has been selected yet
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The frame resource selected for display
    pub fn current_frame(&self) -> Option<&Frame> {
        self.selected.and_then(|i| self.frames.get(i))
    }

    pub fn frames(&self) -> &Arc<FrameCollection> {
        &self.frames
    }

    // Mutators below are unchecked and take effect on the next `advance`.

    pub fn set_frame_count(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
    }

    pub fn set_frame_delay(&mut self, frame_delay: f32) {
        self.frame_delay = frame_delay;
    }

    pub fn set_frame_duration(&mut self, frame_duration: f32) {
        self.frame_duration = frame_duration;
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Pause advancing whenever the index reaches `frame`; `None` releases it
    pub fn set_hold_frame(&mut self, frame: Option<usize>) {
        self.hold_frame = frame;
    }

    pub fn clear_hold(&mut self) {
        self.hold_frame = None;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_current_index(&mut self, index: usize) {
        self.current_index = index;
    }
}
