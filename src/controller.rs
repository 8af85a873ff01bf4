//! Poll controller and builder.
//!
//! The [`PollController`] owns the bridge state between triggers: settings,
//! the image adapter, the last retained frame and the id of the last
//! emitted frame. Each [`poll`](PollController::poll) runs one cycle:
//!
//! 1. Apply pending control messages (policy flags)
//! 2. Emit `connected`, stop if disconnected
//! 3. Fetch the current frame, emit `fps`
//! 4. Stop on a duplicate when `unique` is set
//! 5. Replay the backlog oldest first (`allframes`) or emit the latest frame
//!
//! # Example
//!
//! ```
//! use leap_bridge::model::Frame;
//! use leap_bridge::sink::CollectingSink;
//! use leap_bridge::source::RecordedSource;
//! use leap_bridge::{BridgeBuilder, PollOutcome};
//!
//! let mut source = RecordedSource::new();
//! source.push(Frame::new(1, 0));
//!
//! let mut bridge = BridgeBuilder::new(source).unique(true).build();
//! let mut sink = CollectingSink::new();
//!
//! assert_eq!(bridge.poll(&mut sink).unwrap(), PollOutcome::Emitted { frames: 1 });
//! assert_eq!(bridge.poll(&mut sink).unwrap(), PollOutcome::Duplicate);
//! ```

use crate::codec::FrameCodec;
use crate::control::{BridgeConfig, ControlHandle, ControlMessage, ControlQueue};
use crate::decompose::{Decompose, Dialect, LegacyDialect, NativeDialect};
use crate::error::{BridgeError, Result};
use crate::images::ImageChannelAdapter;
use crate::model::{Frame, ImageList};
use crate::protocol::{Channel, MatrixInput, Record};
use crate::sink::OutputSink;
use crate::source::FrameSource;

/// Where the controller is within a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    Fetching,
    Replaying,
    EmittingLatest,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The sensor is not connected; only `connected 0` was emitted.
    Disconnected,
    /// No new frame since the last emitted one (`unique` mode).
    Duplicate,
    /// Frames were decomposed. Invalid frames are not counted.
    Emitted { frames: usize },
}

/// Fluent builder for a [`PollController`].
pub struct BridgeBuilder<S> {
    source: S,
    config: BridgeConfig,
}

impl<S: FrameSource> BridgeBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: BridgeConfig::default(),
        }
    }

    /// Start from a complete configuration.
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn unique(mut self, enabled: bool) -> Self {
        self.config.unique = enabled;
        self
    }

    pub fn allframes(mut self, enabled: bool) -> Self {
        self.config.allframes = enabled;
        self
    }

    pub fn images(mut self, enabled: bool) -> Self {
        self.config.images = enabled;
        self
    }

    pub fn serialize(mut self, enabled: bool) -> Self {
        self.config.serialize = enabled;
        self
    }

    pub fn motion_tracking(mut self, enabled: bool) -> Self {
        self.config.motion_tracking = enabled;
        self
    }

    pub fn hmd(mut self, enabled: bool) -> Self {
        self.config.hmd = enabled;
        self
    }

    pub fn background(mut self, enabled: bool) -> Self {
        self.config.background = enabled;
        self
    }

    /// Select the legacy record dialect.
    pub fn legacy(mut self, enabled: bool) -> Self {
        self.config.legacy = enabled;
        self
    }

    pub fn build(self) -> PollController<S> {
        PollController::new(self.source, self.config)
    }
}

/// One bridge instance.
pub struct PollController<S> {
    source: S,
    config: BridgeConfig,
    images: ImageChannelAdapter,
    control: ControlQueue,
    state: PollState,
    /// Frame retained from the previous poll, the motion reference.
    last_frame: Option<Frame>,
    /// Id of the newest frame emitted so far.
    last_frame_id: i64,
}

impl<S: FrameSource> PollController<S> {
    /// Create a controller and register for the source's connect events.
    ///
    /// The initial policy is applied on the first poll.
    pub fn new(mut source: S, config: BridgeConfig) -> Self {
        let control = ControlQueue::new();
        source.add_listener(Box::new(control.handle()));
        control.handle().configure();

        Self {
            source,
            config,
            images: ImageChannelAdapter::new(),
            control,
            state: PollState::Idle,
            last_frame: None,
            last_frame_id: 0,
        }
    }

    pub fn builder(source: S) -> BridgeBuilder<S> {
        BridgeBuilder::new(source)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn last_frame_id(&self) -> i64 {
        self.last_frame_id
    }

    pub fn image_adapter(&self) -> &ImageChannelAdapter {
        &self.images
    }

    /// Handle for scheduling reconfiguration from other threads.
    pub fn control_handle(&self) -> ControlHandle {
        self.control.handle()
    }

    /// Schedule a policy re-application.
    pub fn configure(&self) {
        self.control.handle().configure();
    }

    /// Apply pending control messages now. Returns how many were handled.
    pub fn run_pending(&mut self) -> usize {
        let pending = self.control.drain();
        for msg in &pending {
            match msg {
                ControlMessage::Configure => {
                    let flags = self.config.policy_flags();
                    tracing::debug!("Applying policy flags {:#05b}", flags);
                    self.source.set_policy_flags(flags);
                }
            }
        }
        pending.len()
    }

    /// Replace every setting at once and schedule a policy re-application.
    pub fn set_config(&mut self, config: BridgeConfig) {
        self.config = config;
        self.configure();
    }

    pub fn set_unique(&mut self, enabled: bool) {
        self.config.unique = enabled;
    }

    pub fn set_allframes(&mut self, enabled: bool) {
        self.config.allframes = enabled;
    }

    pub fn set_serialize(&mut self, enabled: bool) {
        self.config.serialize = enabled;
    }

    pub fn set_motion_tracking(&mut self, enabled: bool) {
        self.config.motion_tracking = enabled;
    }

    pub fn set_legacy(&mut self, enabled: bool) {
        self.config.legacy = enabled;
    }

    pub fn set_images(&mut self, enabled: bool) {
        self.config.images = enabled;
        self.configure();
    }

    pub fn set_hmd(&mut self, enabled: bool) {
        self.config.hmd = enabled;
        self.configure();
    }

    pub fn set_background(&mut self, enabled: bool) {
        self.config.background = enabled;
        self.configure();
    }

    /// Run one poll cycle, emitting on `sink`.
    ///
    /// # Errors
    ///
    /// Only sink failures abort a cycle. The controller is back in
    /// [`PollState::Idle`] either way.
    pub fn poll(&mut self, sink: &mut dyn OutputSink) -> Result<PollOutcome> {
        let result = self.poll_cycle(sink);
        self.state = PollState::Idle;
        if let Err(e) = &result {
            tracing::error!("Poll aborted: {}", e);
        }
        result
    }

    /// Decompose a frame received as a serialized envelope.
    ///
    /// Serialization is forced off. The poll state (`last_frame`,
    /// `last_frame_id`) is left untouched. Returns the number of frames
    /// decomposed (0 for an invalid frame).
    pub fn ingest(&self, input: &MatrixInput<'_>, sink: &mut dyn OutputSink) -> Result<usize> {
        let frame = input
            .serialized_frame()
            .and_then(|serialized| FrameCodec::decode(&serialized))
            .map_err(|e| {
                tracing::error!("Cannot deserialize frame: {}", e);
                e
            })?;

        self.decompose(&frame, false, sink)?;
        Ok(usize::from(frame.is_valid()))
    }

    fn poll_cycle(&mut self, sink: &mut dyn OutputSink) -> Result<PollOutcome> {
        self.run_pending();
        self.state = PollState::Fetching;

        let connected = self.source.is_connected();
        sink.emit(Channel::Message, Record::Connected(connected))?;
        if !connected {
            return Ok(PollOutcome::Disconnected);
        }

        let current = self.source.frame(0);
        sink.emit(Channel::Message, Record::Fps(current.fps))?;

        let current_id = current.id;
        if self.config.unique && current_id <= self.last_frame_id {
            tracing::debug!("Frame {} already emitted, skipping", current_id);
            self.last_frame = Some(current);
            return Ok(PollOutcome::Duplicate);
        }

        let frames = if self.config.allframes {
            self.state = PollState::Replaying;
            self.replay(current_id, sink)?
        } else {
            self.state = PollState::EmittingLatest;
            if self.config.images {
                let images = self.source.images();
                self.extract_images(&images, sink)?;
            }
            self.decompose(&current, self.config.serialize, sink)?;
            usize::from(current.is_valid())
        };

        self.last_frame_id = current_id;
        self.last_frame = Some(current);
        Ok(PollOutcome::Emitted { frames })
    }

    /// Emit every frame after `last_frame_id` up to `current_id`, oldest first.
    fn replay(&mut self, current_id: i64, sink: &mut dyn OutputSink) -> Result<usize> {
        let behind = current_id.saturating_sub(self.last_frame_id).max(0);
        let mut pending = usize::try_from(behind).unwrap_or(usize::MAX);
        let depth = self.source.history_len();
        if pending > depth {
            tracing::warn!(
                "{} frames behind, replaying only the {} held by the sensor",
                pending,
                depth
            );
            pending = depth;
        }

        let mut emitted = 0;
        for history in (0..pending).rev() {
            let frame = self.source.frame(history);
            if self.config.images {
                self.extract_images(&frame.images, sink)?;
            }
            self.decompose(&frame, self.config.serialize, sink)?;
            if frame.is_valid() {
                emitted += 1;
            }
        }
        Ok(emitted)
    }

    fn decompose(&self, frame: &Frame, serialize: bool, sink: &mut dyn OutputSink) -> Result<()> {
        let previous = self.last_frame.as_ref();
        match self.config.dialect() {
            Dialect::Native => NativeDialect::new(self.config.motion_tracking, serialize)
                .decompose(frame, previous, sink),
            Dialect::Legacy => LegacyDialect.decompose(frame, previous, sink),
        }
    }

    /// Publish images; a pixel-format mismatch is logged by the adapter
    /// and does not abort the cycle.
    fn extract_images(&mut self, images: &ImageList, sink: &mut dyn OutputSink) -> Result<()> {
        match self.images.extract(images, sink) {
            Ok(_) | Err(BridgeError::UnsupportedPixelFormat { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
