//! Parameter automation.
//!
//! Bus gains are driven by a list of timed commands in the style of an
//! audio-parameter API. [`ParamTimeline`] evaluates such a list at any
//! time; renderers use it to compute gains and the mix bus keeps one as a
//! mirror of what it has sent.

/// A timed change to a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Automation {
    /// Jump to `value` at `time`.
    SetValueAt { value: f32, time: f64 },
    /// Ramp linearly from the previous point to `value`, arriving at `end`.
    LinearRampTo { value: f32, end: f64 },
    /// Ramp exponentially from the previous point to `value`, arriving at `end`.
    /// Falls back to linear when either end is not positive.
    ExponentialRampTo { value: f32, end: f64 },
    /// Drop every point at or after `from`.
    CancelScheduled { from: f64 },
    /// Freeze the parameter at whatever value it has at `at` and drop
    /// everything scheduled after it.
    CancelAndHold { at: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shape {
    Step,
    Linear,
    Exponential,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Point {
    time: f64,
    value: f32,
    /// How the parameter travels from the previous point to this one.
    shape: Shape,
}

/// Evaluates a sequence of [`Automation`] commands.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamTimeline {
    initial: f32,
    points: Vec<Point>,
}

impl ParamTimeline {
    pub fn new(initial: f32) -> Self {
        Self::with_capacity(initial, 16)
    }

    /// Create a timeline with room for `capacity` points.
    pub fn with_capacity(initial: f32, capacity: usize) -> Self {
        Self {
            initial,
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn apply(&mut self, cmd: Automation) {
        match cmd {
            Automation::SetValueAt { value, time } => self.insert(Point {
                time,
                value,
                shape: Shape::Step,
            }),
            Automation::LinearRampTo { value, end } => self.insert(Point {
                time: end,
                value,
                shape: Shape::Linear,
            }),
            Automation::ExponentialRampTo { value, end } => self.insert(Point {
                time: end,
                value,
                shape: Shape::Exponential,
            }),
            Automation::CancelScheduled { from } => self.points.retain(|p| p.time < from),
            Automation::CancelAndHold { at } => {
                let held = self.value_at(at);
                let cut = self.points.partition_point(|p| p.time < at);
                // A ramp that straddles `at` is truncated, not flattened.
                let shape = match self.points.get(cut) {
                    Some(p) if p.time > at && p.shape != Shape::Step => p.shape,
                    _ => Shape::Step,
                };
                self.points.truncate(cut);
                self.points.push(Point {
                    time: at,
                    value: held,
                    shape,
                });
            }
        }
    }

    /// Parameter value at time `t`.
    pub fn value_at(&self, t: f64) -> f32 {
        let idx = self.points.partition_point(|p| p.time <= t);
        let (t0, v0) = match idx.checked_sub(1).map(|i| self.points[i]) {
            Some(p) => (p.time, p.value),
            None => (0.0, self.initial),
        };
        match self.points.get(idx) {
            Some(next) if next.shape != Shape::Step => {
                let span = next.time - t0;
                if span <= 0.0 {
                    return next.value;
                }
                let frac = ((t - t0) / span).clamp(0.0, 1.0);
                interpolate(v0, next.value, frac, next.shape)
            }
            _ => v0,
        }
    }

    /// Forget points that can no longer affect values at or after `t`.
    ///
    /// The last point at or before `t` is kept as the origin of any ramp
    /// still in progress. Does not allocate.
    pub fn prune_before(&mut self, t: f64) {
        let idx = self.points.partition_point(|p| p.time <= t);
        if idx > 1 {
            self.points.drain(..idx - 1);
        }
    }

    /// Number of scheduled points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn insert(&mut self, point: Point) {
        let pos = self.points.partition_point(|p| p.time <= point.time);
        self.points.insert(pos, point);
    }
}

fn interpolate(from: f32, to: f32, frac: f64, shape: Shape) -> f32 {
    let frac = frac as f32;
    match shape {
        Shape::Exponential if from > 0.0 && to > 0.0 => from * (to / from).powf(frac),
        _ => from + (to - from) * frac,
    }
}
