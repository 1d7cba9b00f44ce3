//! # Motion Presets
//!
//! One shared animation configuration for every animated widget.
//!
//! ## Overview
//!
//! [`MotionPreset::resolve`] turns the reduced-motion preference into timing
//! constants: a short eased transition, a spring for sliding panels and a
//! stagger interval for lists. With reduced motion every duration and the
//! stagger collapse to zero, so consumers render their resting state at once.
//!
//! The preference itself is a [`MotionPreference`] signal backed by a
//! `tokio::sync::watch` channel. Widgets hold a [`MotionProvider`], which
//! subscribes on creation, re-resolves the preset when a change is pending
//! and unsubscribes when dropped.
//!
//! The module also carries the small math the animations share: cubic-bezier
//! easing, piecewise-linear [`interpolate`] for scroll-linked transforms and a
//! damped [`SpringState`].

use std::time::Duration;
use tokio::sync::watch;

/// Default transition length when motion is allowed.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(250);

/// Default delay between consecutive list items.
pub const STAGGER_INTERVAL: Duration = Duration::from_millis(40);

/// `cubic-bezier(0.22, 1, 0.36, 1)`, a fast-out curve.
pub const EASE_OUT_QUINT: CubicBezier = CubicBezier::new(0.22, 1.0, 0.36, 1.0);

/// A CSS-style cubic-bezier timing curve with fixed end points (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    fn sample(a1: f32, a2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
    }

    fn slope(a1: f32, a2: f32, s: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
    }

    /// Map linear progress `t` (clamped to 0..=1) onto the curve.
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }

        // Newton-Raphson on x(s) = t, bisection when the slope flattens.
        let mut s = t;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, s) - t;
            if err.abs() < 1e-5 {
                return Self::sample(self.y1, self.y2, s);
            }
            let d = Self::slope(self.x1, self.x2, s);
            if d.abs() < 1e-6 {
                break;
            }
            s = (s - err / d).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        s = t;
        for _ in 0..32 {
            let x = Self::sample(self.x1, self.x2, s);
            if (x - t).abs() < 1e-5 {
                break;
            }
            if x < t {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        Self::sample(self.y1, self.y2, s)
    }
}

/// Duration and easing of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: CubicBezier,
}

impl Transition {
    /// Eased progress `elapsed / duration`. A zero duration is always complete.
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.easing
            .ease(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }
}

/// Damped spring constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Snap to the target instead of simulating.
    pub instant: bool,
}

/// The shared animation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPreset {
    pub transition: Transition,
    pub spring: Spring,
    pub stagger: Duration,
}

impl MotionPreset {
    /// Resolve the preset for a reduced-motion preference.
    pub fn resolve(reduced: bool) -> Self {
        if reduced {
            return Self {
                transition: Transition {
                    duration: Duration::ZERO,
                    easing: EASE_OUT_QUINT,
                },
                spring: Spring {
                    stiffness: 0.0,
                    damping: 0.0,
                    mass: 1.0,
                    instant: true,
                },
                stagger: Duration::ZERO,
            };
        }

        Self {
            transition: Transition {
                duration: TRANSITION_DURATION,
                easing: EASE_OUT_QUINT,
            },
            spring: Spring {
                stiffness: 420.0,
                damping: 38.0,
                mass: 0.8,
                instant: false,
            },
            stagger: STAGGER_INTERVAL,
        }
    }

    /// True when the preset was resolved for reduced motion.
    pub fn is_reduced(&self) -> bool {
        self.transition.duration.is_zero()
    }
}

/// Piecewise-linear mapping of `value` through `input` stops onto `output`
/// stops, clamped at both ends. `input` must be ascending and the two slices
/// the same length.
pub fn interpolate(value: f32, input: &[f32], output: &[f32]) -> f32 {
    debug_assert_eq!(input.len(), output.len());
    let (Some(&first_in), Some(&last_in)) = (input.first(), input.last()) else {
        return value;
    };
    if value <= first_in {
        return output[0];
    }
    if value >= last_in {
        return output[output.len() - 1];
    }
    for i in 1..input.len() {
        if value <= input[i] {
            let span = input[i] - input[i - 1];
            if span <= f32::EPSILON {
                return output[i];
            }
            let t = (value - input[i - 1]) / span;
            return output[i - 1] + (output[i] - output[i - 1]) * t;
        }
    }
    output[output.len() - 1]
}

/// Position and velocity of a value driven by a [`Spring`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringState {
    pub position: f32,
    pub velocity: f32,
}

const SPRING_MAX_STEP: f32 = 1.0 / 120.0;
const SPRING_REST_DELTA: f32 = 0.005;
const SPRING_REST_SPEED: f32 = 0.05;

impl SpringState {
    pub fn at(position: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
        }
    }

    /// Advance the simulation by `dt` toward `target`.
    pub fn step(&mut self, target: f32, dt: Duration, spring: &Spring) {
        if spring.instant || spring.stiffness <= 0.0 {
            *self = Self::at(target);
            return;
        }

        let mut remaining = dt.as_secs_f32();
        while remaining > 0.0 {
            let h = remaining.min(SPRING_MAX_STEP);
            let force =
                -spring.stiffness * (self.position - target) - spring.damping * self.velocity;
            self.velocity += force / spring.mass * h;
            self.position += self.velocity * h;
            remaining -= h;
        }

        if self.is_settled(target) {
            *self = Self::at(target);
        }
    }

    pub fn is_settled(&self, target: f32) -> bool {
        (self.position - target).abs() < SPRING_REST_DELTA
            && self.velocity.abs() < SPRING_REST_SPEED
    }
}

/// The reduced-motion preference signal.
#[derive(Debug)]
pub struct MotionPreference {
    tx: watch::Sender<bool>,
}

impl MotionPreference {
    pub fn new(reduced: bool) -> Self {
        let (tx, _rx) = watch::channel(reduced);
        Self { tx }
    }

    pub fn is_reduced(&self) -> bool {
        *self.tx.borrow()
    }

    /// Publish a new preference to every subscribed provider.
    pub fn set(&self, reduced: bool) {
        self.tx.send_if_modified(|current| {
            if *current == reduced {
                return false;
            }
            *current = reduced;
            true
        });
    }

    /// Flip the preference and return the new value.
    pub fn toggle(&self) -> bool {
        let reduced = !self.is_reduced();
        self.set(reduced);
        reduced
    }

    /// Subscribe a new provider, resolved for the current value.
    pub fn subscribe(&self) -> MotionProvider {
        let mut rx = self.tx.subscribe();
        let reduced = *rx.borrow_and_update();
        MotionProvider {
            rx,
            preset: MotionPreset::resolve(reduced),
        }
    }

    /// Number of live providers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A subscriber to [`MotionPreference`] holding the resolved preset.
#[derive(Debug)]
pub struct MotionProvider {
    rx: watch::Receiver<bool>,
    preset: MotionPreset,
}

impl MotionProvider {
    /// Re-resolve the preset if the preference changed. Returns true on change.
    pub fn refresh(&mut self) -> bool {
        if !self.rx.has_changed().unwrap_or(false) {
            return false;
        }
        let reduced = *self.rx.borrow_and_update();
        let next = MotionPreset::resolve(reduced);
        let changed = next != self.preset;
        self.preset = next;
        changed
    }

    pub fn preset(&self) -> &MotionPreset {
        &self.preset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_preset_collapses_all_durations() {
        let preset = MotionPreset::resolve(true);
        assert!(preset.is_reduced());
        assert_eq!(preset.transition.duration, Duration::ZERO);
        assert_eq!(preset.stagger, Duration::ZERO);
        assert!(preset.spring.instant);
    }

    #[test]
    fn test_full_preset_constants() {
        let preset = MotionPreset::resolve(false);
        assert!(!preset.is_reduced());
        assert_eq!(preset.transition.duration, Duration::from_millis(250));
        assert_eq!(preset.stagger, Duration::from_millis(40));
        assert_eq!(preset.spring.stiffness, 420.0);
        assert_eq!(preset.spring.damping, 38.0);
        assert_eq!(preset.spring.mass, 0.8);
    }

    #[test]
    fn test_ease_endpoints_and_monotonic() {
        let curve = EASE_OUT_QUINT;
        assert_eq!(curve.ease(0.0), 0.0);
        assert_eq!(curve.ease(1.0), 1.0);
        assert_eq!(curve.ease(-3.0), 0.0);
        assert_eq!(curve.ease(7.0), 1.0);

        let mut last = 0.0;
        for i in 1..=20 {
            let v = curve.ease(i as f32 / 20.0);
            assert!(v >= last - 1e-4, "curve must not go backwards");
            last = v;
        }
        // fast-out: well past the linear midpoint at t = 0.5
        assert!(curve.ease(0.5) > 0.8);
    }

    #[test]
    fn test_linear_bezier_is_identity() {
        let linear = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        for t in [0.1, 0.25, 0.5, 0.9] {
            assert!((linear.ease(t) - t).abs() < 1e-3);
        }
    }

    #[test]
    fn test_zero_duration_transition_is_complete() {
        let preset = MotionPreset::resolve(true);
        assert_eq!(preset.transition.progress(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_interpolate_clamps_and_maps() {
        let input = [0.0, 0.06];
        let output = [0.35, 0.88];
        assert_eq!(interpolate(-1.0, &input, &output), 0.35);
        assert_eq!(interpolate(1.0, &input, &output), 0.88);
        assert!((interpolate(0.03, &input, &output) - 0.615).abs() < 1e-4);

        let three = interpolate(0.7, &[0.0, 0.4, 1.0], &[0.0, 0.6, 1.0]);
        assert!((three - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_spring_reaches_target_and_settles() {
        let spring = MotionPreset::resolve(false).spring;
        let mut state = SpringState::at(-28.0);
        for _ in 0..120 {
            state.step(0.0, Duration::from_millis(16), &spring);
        }
        assert_eq!(state, SpringState::at(0.0));
    }

    #[test]
    fn test_spring_stays_stable_with_long_frames() {
        let spring = MotionPreset::resolve(false).spring;
        let mut state = SpringState::at(0.0);
        state.step(1.0, Duration::from_millis(250), &spring);
        assert!(state.position.is_finite());
        assert!(state.position <= 1.2);
    }

    #[test]
    fn test_instant_spring_snaps() {
        let spring = MotionPreset::resolve(true).spring;
        let mut state = SpringState::at(-28.0);
        state.step(0.0, Duration::from_millis(1), &spring);
        assert_eq!(state.position, 0.0);
    }

    #[test]
    fn test_provider_follows_preference_changes() {
        let preference = MotionPreference::new(false);
        let mut provider = preference.subscribe();
        assert!(!provider.preset().is_reduced());
        assert!(!provider.refresh());

        preference.set(true);
        assert!(provider.refresh());
        assert!(provider.preset().is_reduced());

        // setting the same value publishes nothing
        preference.set(true);
        assert!(!provider.refresh());

        assert!(!preference.toggle());
        assert!(provider.refresh());
        assert!(!provider.preset().is_reduced());
    }

    #[test]
    fn test_dropping_provider_unsubscribes() {
        let preference = MotionPreference::new(false);
        assert_eq!(preference.subscriber_count(), 0);
        let provider = preference.subscribe();
        assert_eq!(preference.subscriber_count(), 1);
        drop(provider);
        assert_eq!(preference.subscriber_count(), 0);
    }
}
