//! Time series and rolling interpolation windows
use crate::{constants::EPOCH_TOLERANCE_S, prelude::Epoch};

use std::ops::Range;

/// Chronological samples of one satellite. Values of `T` are stored
/// in parallel to the sampling instants.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimeSeries<T> {
    pub epochs: Vec<Epoch>,
    pub values: Vec<T>,
}

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self {
            epochs: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> TimeSeries<T> {
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn last_epoch(&self) -> Option<Epoch> {
        self.epochs.last().copied()
    }

    /// Appends a new sample. A sample closer than `epsilon_s` to the latest
    /// one replaces it. Returns true when a new sample was actually appended.
    pub fn push(&mut self, epoch: Epoch, value: T, epsilon_s: f64) -> bool {
        if let Some(last) = self.epochs.last_mut() {
            if (epoch - *last).to_seconds().abs() < epsilon_s {
                *last = epoch;
                if let Some(last) = self.values.last_mut() {
                    *last = value;
                }
                return false;
            }
        }
        self.epochs.push(epoch);
        self.values.push(value);
        true
    }
}

/// Interpolation window settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WindowSettings {
    /// Number of samples in the window
    pub size: usize,
    /// Nominal sampling interval (s)
    pub interval_s: f64,
    /// Number of missing samples tolerated within the window
    pub allowed_gaps: usize,
}

impl WindowSettings {
    /// Longest window span we tolerate (s)
    fn max_span_s(&self) -> f64 {
        self.interval_s * (self.size + self.allowed_gaps).saturating_sub(1) as f64
            + EPOCH_TOLERANCE_S
    }
}

/// Outcome of a window evaluation at a given instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Evaluation {
    /// Window is not usable at this instant
    Invalid,
    /// Query instant matches a sample: use it as is
    Exact(usize),
    /// Interpolate over the window
    Interpolate,
}

/// Rolling window of one satellite: tracks the sample nearest to the
/// simulated time, and the samples surrounding it.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RollingWindow {
    /// Nearest sample, equals the series length once we went past the series
    nearest: Option<usize>,
    /// Current window
    range: Range<usize>,
    /// Validity at the latest evaluation
    valid: bool,
}

impl RollingWindow {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Window centered on `nearest`: 2n+1 samples => [-n, n], 2n samples => [-n, n)
    fn materialize(&mut self, nearest: usize, len: usize, size: usize) {
        let start = nearest.saturating_sub(size / 2);
        let end = (nearest + (size + 1) / 2).min(len);
        self.range = start..end;
    }

    /// Locates the nearest sample with a binary search, then evaluates.
    pub fn set_up(&mut self, epochs: &[Epoch], t: Epoch, settings: &WindowSettings) -> Evaluation {
        self.nearest = None;
        self.range = 0..0;
        self.valid = false;

        if epochs.is_empty() {
            return Evaluation::Invalid;
        }

        let mut index = epochs.partition_point(|epoch| *epoch < t);
        if index == epochs.len() {
            self.nearest = Some(index);
            return Evaluation::Invalid;
        }

        if settings.size % 2 == 1 && index > 0 {
            let (prev, next) = (epochs[index - 1], epochs[index]);
            if (t - prev).abs() < (t - next).abs() {
                index -= 1;
            }
        }

        self.nearest = Some(index);
        self.materialize(index, epochs.len(), settings.size);
        self.evaluate(epochs, t, settings)
    }

    /// Moves forward while the next sample is closer to `t`, then evaluates.
    /// Time is expected to move forward, by small steps.
    pub fn update(&mut self, epochs: &[Epoch], t: Epoch, settings: &WindowSettings) -> Evaluation {
        let Some(mut index) = self.nearest else {
            self.valid = false;
            return Evaluation::Invalid;
        };

        if index >= epochs.len() {
            self.valid = false;
            return Evaluation::Invalid;
        }

        let mut moved = false;
        while index + 1 < epochs.len() && (t - epochs[index + 1]).abs() < (t - epochs[index]).abs() {
            index += 1;
            moved = true;
        }

        if moved {
            self.nearest = Some(index);
            self.materialize(index, epochs.len(), settings.size);
        }

        self.evaluate(epochs, t, settings)
    }

    fn evaluate(&mut self, epochs: &[Epoch], t: Epoch, settings: &WindowSettings) -> Evaluation {
        self.valid = false;

        let Some(nearest) = self.nearest.filter(|index| *index < epochs.len()) else {
            return Evaluation::Invalid;
        };

        let dt_s = (t - epochs[nearest]).to_seconds().abs();
        if dt_s > settings.interval_s {
            return Evaluation::Invalid;
        }

        if self.range.len() != settings.size {
            return Evaluation::Invalid;
        }

        let span_s = (epochs[self.range.end - 1] - epochs[self.range.start]).to_seconds();
        if span_s > settings.max_span_s() {
            return Evaluation::Invalid;
        }

        self.valid = true;

        if dt_s < EPOCH_TOLERANCE_S {
            Evaluation::Exact(nearest)
        } else {
            Evaluation::Interpolate
        }
    }
}

/// Window instants, in seconds relative to `t`
pub(crate) fn relative_times(epochs: &[Epoch], t: Epoch) -> Vec<f64> {
    epochs.iter().map(|epoch| (*epoch - t).to_seconds()).collect()
}
