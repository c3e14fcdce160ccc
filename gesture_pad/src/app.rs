//! The session: identity gate → gesture engine → action sink.
//!
//! `Session` owns one of each and processes frames strictly one at a time.
//! [`run`] pulls frames from a [`FrameSource`] until it signals stop.

use face_gate::{IdentityGate, Recognizer};
use gesture_engine::{Action, GestureEngine};
use tracing::{debug, info, warn};

use crate::dispatch::ActionSink;
use crate::source::{FrameSource, SensedFrame, SourceError};

// ════════════════════════════════════════════════════════════════════════════
// SessionStats
// ════════════════════════════════════════════════════════════════════════════

/// Counters reported when a session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames:          u64,
    /// Frames seen while the gate was still closed.
    pub gated_frames:    u64,
    pub actions:         u64,
    pub sink_failures:   u64,
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

pub struct Session<S, R> {
    gate:       IdentityGate,
    recognizer: R,
    engine:     GestureEngine,
    sink:       S,
    stats:      SessionStats,
}

impl<S, R> Session<S, R>
where
    S: ActionSink,
    R: Recognizer<SensedFrame>,
{
    pub fn new(gate: IdentityGate, recognizer: R, engine: GestureEngine, sink: S) -> Self {
        Session { gate, recognizer, engine, sink, stats: SessionStats::default() }
    }

    /// Process one frame and return the actions it produced.
    ///
    /// Until the gate opens nothing reaches the engine.  The frame that opens
    /// the gate is also the first one the engine sees.
    pub fn handle_frame(&mut self, frame: &SensedFrame) -> Vec<Action> {
        self.stats.frames += 1;

        let was_open = self.gate.is_open();
        if !self.gate.check(&mut self.recognizer, frame) {
            self.stats.gated_frames += 1;
            return Vec::new();
        }
        if !was_open {
            info!(at = ?frame.at, identity = self.gate.target(), "gesture control unlocked");
        }

        let actions = self.engine.step(frame.at, frame.hand.as_ref());
        debug!(gesture = self.engine.last_gesture().name(), n = actions.len(), "frame");

        for action in &actions {
            self.stats.actions += 1;
            if let Err(e) = self.sink.perform(action) {
                self.stats.sink_failures += 1;
                warn!(action = action.name(), "dispatch failed: {}", e);
            }
        }
        actions
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn gate(&self)   -> &IdentityGate  { &self.gate }
    pub fn engine(&self) -> &GestureEngine { &self.engine }
    pub fn sink(&self)   -> &S             { &self.sink }
    pub fn stats(&self)  -> SessionStats   { self.stats }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the frame loop
// ════════════════════════════════════════════════════════════════════════════

/// Drive `session` until `source` stops.  A source error ends the session.
pub fn run<F, S, R>(source: &mut F, session: &mut Session<S, R>) -> Result<SessionStats, SourceError>
where
    F: FrameSource + ?Sized,
    S: ActionSink,
    R: Recognizer<SensedFrame>,
{
    while let Some(frame) = source.next_frame()? {
        session.handle_frame(&frame);
    }
    let stats = session.stats();
    info!(
        frames = stats.frames,
        gated = stats.gated_frames,
        actions = stats.actions,
        failures = stats.sink_failures,
        "session ended"
    );
    Ok(stats)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use std::sync::Arc;

    use face_gate::{
        DetectingRecognizer, DownsampleEmbedder, Embedder, Embedding, EnrolledFace, FaceBox, FixedBoxes,
        Registry,
    };
    use image::{DynamicImage, GrayImage, Luma};
    use hand_pose::Point;

    use crate::dispatch::{RecordingSink, SinkError};
    use crate::pose::{HandModel, SimPose};
    use crate::source::{CameraFaces, PrecomputedFaces};

    struct Broken;
    impl ActionSink for Broken {
        fn perform(&mut self, a: &Action) -> Result<(), SinkError> {
            Err(SinkError::Failed { action: a.name(), reason: "unplugged".into() })
        }
    }

    struct Frames(std::vec::IntoIter<SensedFrame>);
    impl FrameSource for Frames {
        fn next_frame(&mut self) -> Result<Option<SensedFrame>, SourceError> {
            Ok(self.0.next())
        }
    }

    fn gate() -> IdentityGate {
        let reg = Registry::from_faces([
            EnrolledFace { name: "ada".into(), embedding: Embedding::new(vec![0.0, 1.0]) },
        ]).unwrap();
        IdentityGate::new(reg, "ada", 0.8).unwrap()
    }

    fn session<S: ActionSink>(sink: S) -> Session<S, PrecomputedFaces> {
        Session::new(gate(), PrecomputedFaces, GestureEngine::default(), sink)
    }

    fn frame(ms: u64, pose: Option<SimPose>, face: bool) -> SensedFrame {
        SensedFrame {
            at:    Duration::from_millis(ms),
            hand:  pose.map(|p| HandModel::default().synthesize(p)),
            faces: if face { vec![Embedding::new(vec![0.1, 1.0])] } else { Vec::new() },
            image: None,
        }
    }

    #[test]
    fn closed_gate_blocks_everything() {
        let mut s = session(RecordingSink::default());
        for i in 0..10 {
            assert!(s.handle_frame(&frame(i * 600, Some(SimPose::Volume), false)).is_empty());
        }
        assert!(s.sink().actions.is_empty());
        assert_eq!(s.stats().gated_frames, 10);
        assert_eq!(s.engine().volume_cooldown().last_fire(), None);
    }

    #[test]
    fn unlocking_frame_is_processed() {
        let mut s = session(RecordingSink::default());
        let out = s.handle_frame(&frame(0, Some(SimPose::Volume), true));
        assert_eq!(out, vec![Action::VolumeUp]);
        assert_eq!(s.sink().actions, vec![Action::VolumeUp]);
    }

    #[test]
    fn recognizer_idle_after_unlock() {
        let mut s = session(RecordingSink::default());
        s.handle_frame(&frame(0, None, false));
        s.handle_frame(&frame(10, None, true));
        for i in 2..20 {
            s.handle_frame(&frame(i * 10, Some(SimPose::Fist), i % 2 == 0));
        }
        assert_eq!(s.gate().recognizer_calls(), 2);
    }

    #[test]
    fn sink_failure_does_not_disturb_engine() {
        let mut s = session(Broken);
        let out = s.handle_frame(&frame(0, Some(SimPose::Volume), true));
        assert_eq!(out, vec![Action::VolumeUp]);
        assert_eq!(s.stats().sink_failures, 1);
        // Cooldown still applied: the failed dispatch counted as a fire.
        assert!(s.handle_frame(&frame(100, Some(SimPose::Volume), false)).is_empty());
        assert_eq!(s.handle_frame(&frame(500, Some(SimPose::Volume), false)), vec![Action::VolumeUp]);
    }

    #[test]
    fn run_drains_source() {
        let model = HandModel { origin: Point::new(300, 400), ..HandModel::default() };
        let frames = vec![
            frame(0, None, true),
            SensedFrame {
                at:   Duration::from_millis(20),
                hand: Some(model.synthesize(SimPose::MousePad)),
                ..SensedFrame::default()
            },
            SensedFrame {
                at: Duration::from_millis(40),
                hand: Some(HandModel { origin: Point::new(302, 401), ..model }.synthesize(SimPose::MousePad)),
                ..SensedFrame::default()
            },
        ];
        let mut s = session(RecordingSink::default());
        let stats = run(&mut Frames(frames.into_iter()), &mut s).unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.gated_frames, 0);
        assert_eq!(s.sink().actions, vec![Action::MoveRelative { dx: -6, dy: 3 }]);
    }

    #[test]
    fn degenerate_face_crops_leave_engine_untouched() {
        let embedder = DownsampleEmbedder { side: 4 };
        let dark = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([20])));
        let reg = Registry::from_faces([
            EnrolledFace { name: "ada".into(), embedding: embedder.embed(&dark) },
        ]).unwrap();
        let gate = IdentityGate::new(reg, "ada", 0.8).unwrap();

        let zero = FaceBox::new(0.5, 0.5, 0.0, 0.0);
        let mut s = Session::new(
            gate,
            CameraFaces(DetectingRecognizer::new(FixedBoxes(vec![zero]), embedder)),
            GestureEngine::default(),
            RecordingSink::default(),
        );
        let camera = |ms: u64, pose: SimPose| SensedFrame {
            image: Some(Arc::new(dark.clone())),
            ..frame(ms, Some(pose), false)
        };

        assert!(s.handle_frame(&camera(0, SimPose::Volume)).is_empty());
        assert!(s.handle_frame(&camera(100, SimPose::DoubleClick)).is_empty());
        assert!(!s.gate().is_open());
        assert_eq!(s.engine().volume_cooldown().last_fire(), None);
        assert_eq!(s.engine().hold().started(), None);
        assert_eq!(s.stats().gated_frames, 2);
    }

    #[test]
    fn usable_box_beside_degenerate_one_unlocks() {
        let embedder = DownsampleEmbedder { side: 4 };
        let dark = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([20])));
        let reg = Registry::from_faces([
            EnrolledFace { name: "ada".into(), embedding: embedder.embed(&dark) },
        ]).unwrap();
        let gate = IdentityGate::new(reg, "ada", 0.8).unwrap();
        let boxes = FixedBoxes(vec![FaceBox::new(0.5, 0.5, 0.0, 0.0), FaceBox::full()]);
        let mut s = Session::new(
            gate,
            CameraFaces(DetectingRecognizer::new(boxes, embedder)),
            GestureEngine::default(),
            RecordingSink::default(),
        );
        let f = SensedFrame { image: Some(Arc::new(dark)), ..frame(0, Some(SimPose::Volume), false) };
        assert_eq!(s.handle_frame(&f), vec![Action::VolumeUp]);
        assert!(s.gate().is_open());
    }
}
