//! Event types and sinks for observing a generation run.
//!
//! Hosts that realize accepted instances incrementally (streaming them into a
//! scene) can attach a sink via
//! [`crate::generate::runner::DungeonGenerator::run_with_events`]; the default
//! run is silent.
use glam::Vec3;

use crate::generate::{BlockId, Phase};
use crate::geom::Yaw;

/// Events emitted while a generation run executes.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenEvent {
    /// Emitted once before the root phase starts.
    RunStarted {
        /// Ambient offset forwarded to the terrain sampler.
        seed_offset: f32,
        /// Terrain samples feeding the root phase.
        sample_count: usize,
    },

    /// Emitted when the run completes, before auxiliary state is discarded.
    RunFinished { blocks: usize, props: usize },

    PhaseStarted {
        phase: Phase,
    },

    PhaseFinished {
        phase: Phase,
        /// Instances the phase accepted.
        accepted: usize,
    },

    /// A block placement was accepted.
    BlockPlaced {
        phase: Phase,
        id: BlockId,
        template_id: String,
        yaw: Yaw,
        translation: Vec3,
    },

    /// A block attempt exhausted its retry budget and was discarded whole.
    BlockRejected {
        phase: Phase,
        template_id: String,
        tries_used: u32,
    },

    /// A prop placement was accepted.
    PropPlaced {
        phase: Phase,
        template_id: String,
        position: Vec3,
    },

    /// A prop collided and was discarded.
    PropRejected {
        phase: Phase,
        template_id: String,
        position: Vec3,
    },

    /// Non-fatal condition worth surfacing.
    Warning { context: String, message: String },
}

/// Discriminant used by sinks to opt out of expensive events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenEventKind {
    RunStarted,
    RunFinished,
    PhaseStarted,
    PhaseFinished,
    BlockPlaced,
    BlockRejected,
    PropPlaced,
    PropRejected,
    Warning,
}

impl GenEvent {
    pub fn kind(&self) -> GenEventKind {
        match self {
            GenEvent::RunStarted { .. } => GenEventKind::RunStarted,
            GenEvent::RunFinished { .. } => GenEventKind::RunFinished,
            GenEvent::PhaseStarted { .. } => GenEventKind::PhaseStarted,
            GenEvent::PhaseFinished { .. } => GenEventKind::PhaseFinished,
            GenEvent::BlockPlaced { .. } => GenEventKind::BlockPlaced,
            GenEvent::BlockRejected { .. } => GenEventKind::BlockRejected,
            GenEvent::PropPlaced { .. } => GenEventKind::PropPlaced,
            GenEvent::PropRejected { .. } => GenEventKind::PropRejected,
            GenEvent::Warning { .. } => GenEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`GenEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenEvent);

    /// Whether this sink cares about events of the given kind. Emitters may
    /// skip constructing events a sink does not want.
    fn wants(&self, _kind: GenEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenEvent) {}

    #[inline]
    fn wants(&self, _kind: GenEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenEvent),
{
    #[inline]
    fn send(&mut self, event: GenEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<GenEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(GenEvent::Warning {
            context: "a".into(),
            message: "m".into(),
        });
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.as_slice()[0].kind(), GenEventKind::Warning);
    }

    #[test]
    fn unit_sink_wants_nothing() {
        let sink = ();
        assert!(!sink.wants(GenEventKind::BlockPlaced));
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(GenEvent::PhaseStarted {
            phase: Phase::Roots,
        });
        assert_eq!(count, 1);
    }
}
