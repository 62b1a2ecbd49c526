//! Adaptive traffic signals
//!
//! Every signalized junction cycles through one phase per outgoing road.
//! Adaptive signals stretch each phase according to the congestion of the
//! roads in its direction. The system also keeps a congestion-ordered queue
//! of junctions; it is bookkeeping only and does not decide which signals
//! advance.

use std::fmt;

use log::debug;

use super::error::{IdKind, SimError, SimResult};
use super::priority_queue::PriorityQueue;
use super::road_network::SimRoadNetwork;
use super::types::JunctionId;

/// Duration every phase starts with
pub const DEFAULT_PHASE_SECONDS: u32 = 30;
/// Adaptive duration of a phase whose direction is empty
pub const BASE_PHASE_SECONDS: u32 = 20;
/// Adaptive extension for a fully congested direction
pub const MAX_EXTRA_PHASE_SECONDS: u32 = 40;

/// Coarse compass bucket of a road.
///
/// Taken as the destination junction id modulo 4; there is no geometry in
/// the model to do better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn toward(dest: JunctionId) -> Self {
        Self::ALL[dest.index() % 4]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Green,
    /// Not entered by the current phase cycle
    Yellow,
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightState::Red => "Red",
            LightState::Green => "Green",
            LightState::Yellow => "Yellow",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalPhase {
    pub direction: Direction,
    pub state: LightState,
    /// Seconds
    pub duration: u32,
    /// Seconds left while this phase is current
    pub remaining_time: u32,
}

/// Signal state machine at one junction
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSignal {
    pub junction: JunctionId,
    pub phases: Vec<SignalPhase>,
    pub current_phase: usize,
    pub adaptive: bool,
}

impl TrafficSignal {
    /// One phase per outgoing road, in edge-list order. The first phase
    /// starts green with a full default duration, the rest wait on red.
    pub fn for_junction(
        network: &SimRoadNetwork,
        junction: JunctionId,
        adaptive: bool,
    ) -> SimResult<Self> {
        let phases = network
            .outgoing(junction)?
            .enumerate()
            .map(|(index, (dest, _))| SignalPhase {
                direction: Direction::toward(dest),
                state: if index == 0 {
                    LightState::Green
                } else {
                    LightState::Red
                },
                duration: DEFAULT_PHASE_SECONDS,
                remaining_time: if index == 0 { DEFAULT_PHASE_SECONDS } else { 0 },
            })
            .collect();

        Ok(Self {
            junction,
            phases,
            current_phase: 0,
            adaptive,
        })
    }

    pub fn current(&self) -> Option<&SignalPhase> {
        self.phases.get(self.current_phase)
    }

    /// Overrides one phase. Its remaining time restarts only if it is current.
    pub fn set_phase(
        &mut self,
        index: usize,
        direction: Direction,
        state: LightState,
        duration: u32,
    ) -> SimResult<()> {
        let is_current = index == self.current_phase;
        let phase = self.phases.get_mut(index).ok_or(SimError::InvalidId {
            kind: IdKind::Phase,
            id: index,
        })?;

        phase.direction = direction;
        phase.state = state;
        phase.duration = duration;
        phase.remaining_time = if is_current { duration } else { 0 };
        Ok(())
    }

    /// Resizes every phase to `20 + floor(40 * peak congestion)` of its
    /// direction. The current phase's remaining time is cut down to its new
    /// duration but never extended.
    pub fn adjust_timing(&mut self, network: &SimRoadNetwork) -> SimResult<()> {
        if !self.adaptive {
            return Ok(());
        }

        let mut direction_congestion = [0.0f32; 4];
        for (dest, edge) in network.outgoing(self.junction)? {
            let peak = &mut direction_congestion[Direction::toward(dest).index()];
            *peak = peak.max(edge.road.congestion());
        }

        let current_phase = self.current_phase;
        for (index, phase) in self.phases.iter_mut().enumerate() {
            let congestion = direction_congestion[phase.direction.index()];
            let new_duration =
                BASE_PHASE_SECONDS + (congestion * MAX_EXTRA_PHASE_SECONDS as f32).floor() as u32;
            phase.duration = new_duration;

            if index == current_phase && phase.remaining_time > new_duration {
                phase.remaining_time = new_duration;
            }
        }
        Ok(())
    }

    /// Counts the current phase down one tick and hands over to the next
    /// phase once it runs out
    pub fn advance(&mut self) {
        let phase_count = self.phases.len();
        let Some(phase) = self.phases.get_mut(self.current_phase) else {
            return;
        };

        phase.remaining_time = phase.remaining_time.saturating_sub(1);
        if phase.remaining_time > 0 {
            return;
        }

        phase.state = LightState::Red;
        self.current_phase = (self.current_phase + 1) % phase_count;

        let next = &mut self.phases[self.current_phase];
        next.state = LightState::Green;
        next.remaining_time = next.duration;

        debug!(
            "Signal at junction {} switched to phase {} ({}) for {}s",
            self.junction, self.current_phase, next.direction, next.duration
        );
    }
}

impl fmt::Display for TrafficSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Traffic signal at junction {}", self.junction)?;
        writeln!(
            f,
            "  phases={}, adaptive={}, current phase={}",
            self.phases.len(),
            if self.adaptive { "yes" } else { "no" },
            self.current_phase
        )?;
        for (index, phase) in self.phases.iter().enumerate() {
            writeln!(
                f,
                "    Phase {}: {} {} duration={}s remaining={}s",
                index, phase.direction, phase.state, phase.duration, phase.remaining_time
            )?;
        }
        Ok(())
    }
}

/// All signals of a network plus their congestion priority queue
#[derive(Debug, Clone, Default)]
pub struct SignalSystem {
    signals: Vec<TrafficSignal>,
    queue: PriorityQueue,
}

impl SignalSystem {
    /// Adaptive signals for every junction flagged as signalized, queued by
    /// their current congestion
    pub fn new(network: &SimRoadNetwork) -> SimResult<Self> {
        let mut system = Self::default();
        for junction in network.junctions().filter(|junction| junction.has_signal) {
            system
                .signals
                .push(TrafficSignal::for_junction(network, junction.id, true)?);
        }
        for signal in &system.signals {
            let congestion = network.junction_congestion(signal.junction)?;
            system.queue.insert(signal.junction, congestion);
        }
        Ok(system)
    }

    pub fn signals(&self) -> &[TrafficSignal] {
        &self.signals
    }

    pub fn signal(&self, junction: JunctionId) -> Option<&TrafficSignal> {
        self.signals
            .iter()
            .find(|signal| signal.junction == junction)
    }

    pub fn signal_mut(&mut self, junction: JunctionId) -> Option<&mut TrafficSignal> {
        self.signals
            .iter_mut()
            .find(|signal| signal.junction == junction)
    }

    pub fn queue(&self) -> &PriorityQueue {
        &self.queue
    }

    /// Junctions from most to least congested as last measured
    pub fn priority_order(&self) -> Vec<JunctionId> {
        self.queue.iter().map(|(junction, _)| junction).collect()
    }

    /// Re-measures junction congestion into the queue
    pub fn manage_queue(&mut self, network: &SimRoadNetwork) -> SimResult<()> {
        for signal in &self.signals {
            let congestion = network.junction_congestion(signal.junction)?;
            self.queue.reprioritize(signal.junction, congestion);
        }
        Ok(())
    }

    /// One tick: refresh the queue, then retime and advance every signal
    /// regardless of its place in the queue
    pub fn update(&mut self, network: &SimRoadNetwork) -> SimResult<()> {
        self.manage_queue(network)?;
        for signal in &mut self.signals {
            signal.adjust_timing(network)?;
            signal.advance();
        }
        Ok(())
    }
}

impl fmt::Display for SignalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Traffic Signal System: {} signals", self.signals.len())?;
        write!(f, "{}", self.queue)?;
        for signal in &self.signals {
            write!(f, "{signal}")?;
        }
        Ok(())
    }
}
