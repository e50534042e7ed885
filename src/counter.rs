//! Animated statistic counters.
//!
//! All counters in a stats block share one trigger: the block's container.
//! The first time the container is sufficiently visible, the group's
//! [`CounterGroup`] flips and every counter starts its own [`CounterRun`],
//! counting from zero to its target with a cubic ease-out over a fixed
//! duration. Runs are stepped once per animation frame by the caller and
//! finish when progress reaches 1.
//!
//! The "already counted" flag is held by the group object rather than any
//! ambient state, so two stats blocks (or two tests) never interfere.

use tracing::debug;

use crate::config::CounterConfig;
use crate::visibility::{Observer, VisibilityEvent, VisibilitySource};

/// Cubic ease-out: fast start, gentle landing. `1 - (1 - p)^3`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Fraction of the run completed, clamped to `0.0..=1.0`.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Value shown at `progress` for a counter heading to `target`, never above
/// `target`.
pub fn displayed_value(target: u64, progress: f64) -> u64 {
    let value = (ease_out_cubic(progress) * target as f64).floor() as u64;
    value.min(target)
}

/// Parse a counter target the way the page script always has: optional
/// leading whitespace and `+`, then leading digits. Trailing decoration is
/// ignored, so `"500+"` counts to 500.
pub fn parse_target(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return None;
    }
    unsigned[..end].parse().ok()
}

/// Thousands grouping for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    pub separator: String,
    /// Digits required in the leading group before any grouping happens.
    pub min_grouping_digits: usize,
}

impl NumberFormat {
    pub fn from_config(config: &CounterConfig) -> Self {
        Self {
            separator: config.group_separator.clone(),
            min_grouping_digits: config.min_grouping_digits,
        }
    }

    pub fn format(&self, value: u64) -> String {
        let digits = value.to_string();
        let min_leading = self.min_grouping_digits.max(1);
        if digits.len() < 3 + min_leading {
            return digits;
        }
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 * self.separator.len());
        let lead = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - lead) % 3 == 0 {
                out.push_str(&self.separator);
            }
            out.push(ch);
        }
        out
    }
}

impl Default for NumberFormat {
    /// Spanish: `.` separators, four-digit numbers left alone.
    fn default() -> Self {
        Self {
            separator: ".".to_string(),
            min_grouping_digits: 2,
        }
    }
}

/// One-shot trigger shared by every counter of a stats block.
#[derive(Debug, Default)]
pub struct CounterGroup {
    triggered: bool,
}

impl CounterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag. Returns true only for the first call.
    pub fn trigger(&mut self) -> bool {
        !std::mem::replace(&mut self.triggered, true)
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Counter<T> {
    pub element: T,
    pub target: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Done,
}

/// What one animation frame should display.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub value: u64,
    pub text: String,
    /// No further frames are needed.
    pub finished: bool,
}

/// The counting animation of a single counter.
#[derive(Debug)]
pub struct CounterRun<T> {
    element: T,
    target: u64,
    duration_ms: f64,
    format: NumberFormat,
    started_at: Option<f64>,
    displayed: u64,
    state: RunState,
}

impl<T> CounterRun<T> {
    pub fn new(counter: Counter<T>, duration_ms: u32, format: NumberFormat) -> Self {
        Self {
            element: counter.element,
            target: counter.target,
            duration_ms: f64::from(duration_ms),
            format,
            started_at: None,
            displayed: 0,
            state: RunState::Idle,
        }
    }

    /// Advance to the frame at `timestamp_ms`.
    ///
    /// The first call fixes the start time. The displayed value never
    /// decreases, and the frame at or past the duration shows exactly the
    /// target and finishes the run. Stepping a finished run repeats the final
    /// frame.
    pub fn step(&mut self, timestamp_ms: f64) -> Frame {
        if self.state != RunState::Done {
            let start = *self.started_at.get_or_insert(timestamp_ms);
            let progress = progress(timestamp_ms - start, self.duration_ms);
            if progress >= 1.0 {
                self.displayed = self.target;
                self.state = RunState::Done;
            } else {
                self.displayed = self.displayed.max(displayed_value(self.target, progress));
                self.state = RunState::Running;
            }
        }
        Frame {
            value: self.displayed,
            text: self.format.format(self.displayed),
            finished: self.state == RunState::Done,
        }
    }

    pub fn element(&self) -> &T {
        &self.element
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn state(&self) -> RunState {
        self.state
    }
}

/// Watches a stats container and hands out counter runs when it shows up.
#[derive(Debug)]
pub struct CounterController<T> {
    container: T,
    counters: Vec<Counter<T>>,
    group: CounterGroup,
    duration_ms: u32,
    format: NumberFormat,
}

impl<T: PartialEq> CounterController<T> {
    /// Subscribe the container, or start counting at once without a native
    /// observer. The returned runs are non-empty only in the latter case.
    pub fn activate<O>(
        container: T,
        counters: Vec<Counter<T>>,
        config: &CounterConfig,
        source: &mut VisibilitySource<O>,
    ) -> (Self, Vec<CounterRun<T>>)
    where
        O: Observer<Target = T>,
    {
        let mut controller = Self {
            container,
            counters,
            group: CounterGroup::new(),
            duration_ms: config.duration_ms,
            format: NumberFormat::from_config(config),
        };
        debug!(
            count = controller.counters.len(),
            native = source.is_native(),
            "counters activated"
        );
        let runs = if source.is_native() {
            source.observe(&controller.container);
            Vec::new()
        } else {
            controller.start()
        };
        (controller, runs)
    }

    /// Apply one visibility event for the container.
    ///
    /// Only the first qualifying event starts the runs; everything after that
    /// returns an empty list.
    pub fn handle<O>(&mut self, event: &VisibilityEvent<T>, observer: &mut O) -> Vec<CounterRun<T>>
    where
        O: Observer<Target = T>,
    {
        if !event.is_visible || event.target != self.container || self.group.is_triggered() {
            return Vec::new();
        }
        observer.unobserve(&self.container);
        self.start()
    }

    fn start(&mut self) -> Vec<CounterRun<T>> {
        if !self.group.trigger() {
            return Vec::new();
        }
        let counters = std::mem::take(&mut self.counters);
        debug!(count = counters.len(), "counting started");
        counters
            .into_iter()
            .map(|counter| CounterRun::new(counter, self.duration_ms, self.format.clone()))
            .collect()
    }

    pub fn is_triggered(&self) -> bool {
        self.group.is_triggered()
    }
}
