// Fnmap Remap Decision Engine
// Correlates device-origin presses with system keystrokes and decides
// pass-through vs. rewrite, symmetrically across each press/release pair

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};
use parking_lot::Mutex;

use crate::input::event::{DeviceSignal, NormalizedEvent, SystemKeyEvent};
use crate::input::normalize::{normalize_device, normalize_system};
use crate::key::LogicalKey;
use crate::phase::Phase;
use crate::settings::Settings;
use crate::state::store::SharedCorrelationStore;

/// How device-origin presses are correlated with system keystrokes.
///
/// The two flavors differ only at the boundary: holding a device key past
/// the window. `TimeWindow` stops authorizing new presses once the entry
/// ages out; `DeviceTracked` keeps authorizing them until the device
/// itself reports the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrelationPolicy {
    /// A device press authorizes a rewrite only within a bounded window
    #[default]
    TimeWindow,
    /// A device press authorizes rewrites until the device release
    DeviceTracked,
}

/// Error parsing a policy name from configuration.
#[derive(Debug, thiserror::Error)]
#[error("unknown correlation policy: {0:?} (expected \"time-window\" or \"device-tracked\")")]
pub struct PolicyParseError(pub String);

impl FromStr for CorrelationPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time-window" => Ok(CorrelationPolicy::TimeWindow),
            "device-tracked" => Ok(CorrelationPolicy::DeviceTracked),
            other => Err(PolicyParseError(other.to_string())),
        }
    }
}

impl fmt::Display for CorrelationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationPolicy::TimeWindow => write!(f, "time-window"),
            CorrelationPolicy::DeviceTracked => write!(f, "device-tracked"),
        }
    }
}

/// Decision for one system keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Deliver the event unmodified
    PassThrough,
    /// Rewrite the key code in place before the event propagates
    Rewrite(u16),
}

impl Verdict {
    /// Returns true if this verdict rewrites the event
    pub fn is_rewrite(&self) -> bool {
        matches!(self, Verdict::Rewrite(_))
    }

    /// Apply the verdict to a key code held by the interception callback
    pub fn apply(&self, key_code: &mut u16) {
        if let Verdict::Rewrite(code) = self {
            *key_code = *code;
        }
    }
}

/// Press-time decision remembered until the matching release.
///
/// Presence of a hold is what makes auto-repeat and release decisions
/// symmetric with the original press, independent of store state changes
/// in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldState {
    Remapping,
    PassThrough,
}

/// The event-correlation engine.
///
/// Consumes both raw streams through [`handle_device`] and
/// [`handle_system`]; the former only writes the correlation store, the
/// latter walks the per-key state machine and returns the [`Verdict`]
/// the interception callback applies.
///
/// Both entry points are synchronous and non-blocking: each takes a short
/// mutex for an O(1) map operation and returns. Lock order is holds
/// before store on the system path; the device path never takes the holds
/// lock, so the order cannot invert.
///
/// [`handle_device`]: RemapEngine::handle_device
/// [`handle_system`]: RemapEngine::handle_system
#[derive(Debug)]
pub struct RemapEngine {
    policy: CorrelationPolicy,
    /// Correlation window in milliseconds (time-window policy)
    window: u64,
    /// Master toggle driven by external UI
    enabled: AtomicBool,
    store: SharedCorrelationStore,
    /// Keys currently held on the system stream, with their press-time
    /// decision
    holds: Mutex<HashMap<LogicalKey, HoldState>>,
}

impl RemapEngine {
    /// Create an engine with an explicit policy and window.
    pub fn new(policy: CorrelationPolicy, window_ms: u64) -> Self {
        Self {
            policy,
            window: window_ms,
            enabled: AtomicBool::new(true),
            store: SharedCorrelationStore::new(),
            holds: Mutex::new(HashMap::new()),
        }
    }

    /// Create an engine from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let engine = Self::new(settings.policy(), settings.window_ms());
        engine.set_enabled(settings.enabled());
        engine
    }

    /// The configured correlation policy
    pub fn policy(&self) -> CorrelationPolicy {
        self.policy
    }

    /// The configured correlation window in milliseconds
    pub fn window_ms(&self) -> u64 {
        self.window
    }

    /// Whether the engine is currently rewriting
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Toggle the engine.
    ///
    /// While disabled, new presses pass through and neither stream
    /// mutates the correlation store. Keys already remapping keep their
    /// hold and still complete the matching release rewrite, so toggling
    /// off mid-hold cannot leave a dangling rewritten press.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        debug!("engine {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Number of pending correlation entries (diagnostics).
    pub fn pending_count(&self) -> usize {
        self.store.len()
    }

    /// The host re-enabled the interception point after disabling it
    /// (e.g. a latency timeout). Correlation state deliberately survives
    /// the gap; keys mid-hold resume where they left off.
    pub fn interception_resumed(&self) {
        debug!(
            "interception resumed, {} pending entries retained",
            self.store.len()
        );
    }

    /// Feed one raw device signal.
    ///
    /// Non-keyboard-page and unmapped signals are discarded. A press
    /// marks the key live; a release clears it under the device-tracked
    /// policy and is irrelevant under the time-window policy, where aging
    /// out does the same job.
    pub fn handle_device(&self, signal: &DeviceSignal) {
        let Some(event) = normalize_device(signal) else {
            return;
        };
        if !self.is_enabled() {
            return;
        }

        match event.phase {
            Phase::Press => {
                self.store.mark_live(event.key, event.timestamp);
                trace!("device press {} at {}", event.key, event.timestamp);
            }
            Phase::Release => {
                if self.policy == CorrelationPolicy::DeviceTracked {
                    self.store.clear_live(event.key);
                    trace!("device release {} at {}", event.key, event.timestamp);
                }
            }
        }
    }

    /// Feed one raw system keystroke and get the verdict to apply.
    ///
    /// Keys outside the remap table pass through without touching any
    /// state.
    pub fn handle_system(&self, event: &SystemKeyEvent) -> Verdict {
        let Some(event) = normalize_system(event) else {
            return Verdict::PassThrough;
        };
        self.decide(&event)
    }

    /// Walk the per-key state machine for a normalized system event.
    pub fn decide(&self, event: &NormalizedEvent) -> Verdict {
        let verdict = match event.phase {
            Phase::Press => self.on_press(event),
            Phase::Release => self.on_release(event),
        };
        trace!(
            "system {} {} at {} -> {:?}",
            event.phase,
            event.key,
            event.timestamp,
            verdict
        );
        verdict
    }

    fn on_press(&self, event: &NormalizedEvent) -> Verdict {
        let mut holds = self.holds.lock();

        // A press while the key is already held is auto-repeat: reuse the
        // press-time decision without re-querying, so a hold outliving
        // the window never flips mid-hold.
        if let Some(&state) = holds.get(&event.key) {
            return self.verdict_for(state, event.key);
        }

        let state = if !self.is_enabled() {
            HoldState::PassThrough
        } else {
            let live = match self.policy {
                CorrelationPolicy::TimeWindow => {
                    // The entry stays un-consumed here; the matching
                    // release consumes it.
                    self.store.is_live(event.key, event.timestamp, self.window)
                }
                CorrelationPolicy::DeviceTracked => self.store.is_armed(event.key),
            };
            if live {
                HoldState::Remapping
            } else {
                HoldState::PassThrough
            }
        };

        holds.insert(event.key, state);
        self.verdict_for(state, event.key)
    }

    fn on_release(&self, event: &NormalizedEvent) -> Verdict {
        let state = self.holds.lock().remove(&event.key);
        match state {
            Some(HoldState::Remapping) => {
                if self.policy == CorrelationPolicy::TimeWindow {
                    self.store.consume(event.key);
                }
                Verdict::Rewrite(event.key.target_code())
            }
            Some(HoldState::PassThrough) => Verdict::PassThrough,
            // Orphan release: no recorded press decision (dropped event
            // or engine restart mid-hold). Never rewrite it; a phantom
            // function-key release can desynchronize the receiver.
            None => Verdict::PassThrough,
        }
    }

    fn verdict_for(&self, state: HoldState, key: LogicalKey) -> Verdict {
        match state {
            HoldState::Remapping => Verdict::Rewrite(key.target_code()),
            HoldState::PassThrough => Verdict::PassThrough,
        }
    }
}
