use crate::numeric::is_valid_distance;
use radar_data::{Angle, VisiblePoint};
use std::time::Duration;

/// Latest reading at one angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub distance: f64,
    /// `None` until the slot receives its first reading.
    pub last_seen: Option<Duration>,
}

/// One slot per degree holding the most recent distance and when it was seen.
///
/// Stale slots are only reset when [`SampleBuffer::decay`] is called, so the
/// owner decides when fading is evaluated.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    samples: [Sample; Angle::COUNT],
    fade_time: Duration,
    max_distance: f64,
}

impl SampleBuffer {
    pub fn new(fade_time: Duration, max_distance: f64) -> SampleBuffer {
        SampleBuffer {
            samples: [SampleBuffer::empty(max_distance); Angle::COUNT],
            fade_time,
            max_distance,
        }
    }

    /// Stores `distance` at `angle`. Distances outside `(0, max_distance]` are rejected.
    pub fn update(&mut self, angle: Angle, distance: f64, now: Duration) -> bool {
        if !is_valid_distance(distance, self.max_distance) {
            return false;
        }
        self.samples[angle.index()] = Sample {
            distance,
            last_seen: Some(now),
        };
        true
    }

    /// Reverts every reading older than the fade time to "no detection".
    /// The timestamp is kept, so the slot never reads as visible again.
    pub fn decay(&mut self, now: Duration) {
        let fade_time = self.fade_time;
        let max_distance = self.max_distance;
        self.samples
            .iter_mut()
            .filter(|s| is_expired(s, now, fade_time))
            .for_each(|s| s.distance = max_distance);
    }

    pub fn visible_points(&self, now: Duration) -> Vec<VisiblePoint> {
        Angle::all()
            .zip(self.samples.iter())
            .filter(|(_, s)| self.is_visible(s, now))
            .map(|(angle, s)| VisiblePoint {
                angle,
                distance: s.distance,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.samples = [SampleBuffer::empty(self.max_distance); Angle::COUNT];
    }

    pub fn sample(&self, angle: Angle) -> &Sample {
        &self.samples[angle.index()]
    }

    pub fn fade_time(&self) -> Duration {
        self.fade_time
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    fn is_visible(&self, sample: &Sample, now: Duration) -> bool {
        let Some(last_seen) = sample.last_seen else {
            return false;
        };
        sample.distance < self.max_distance && now.saturating_sub(last_seen) <= self.fade_time
    }

    fn empty(max_distance: f64) -> Sample {
        Sample {
            distance: max_distance,
            last_seen: None,
        }
    }
}

fn is_expired(sample: &Sample, now: Duration, fade_time: Duration) -> bool {
    match sample.last_seen {
        Some(last_seen) => now.saturating_sub(last_seen) > fade_time,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FADE: Duration = Duration::from_secs(3);
    const MAX: f64 = 120.;

    fn angle(degrees: u8) -> Angle {
        Angle::new(degrees).unwrap()
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_fresh_buffer_is_empty() {
        let buffer = SampleBuffer::new(FADE, MAX);
        assert!(buffer.visible_points(Duration::ZERO).is_empty());
        assert_eq!(buffer.sample(angle(0)).distance, MAX);
        assert_eq!(buffer.sample(angle(180)).last_seen, None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        assert!(buffer.update(angle(10), 30., secs(0.)));
        assert!(buffer.update(angle(10), 50., secs(1.)));
        let points = buffer.visible_points(secs(1.));
        assert_eq!(
            points,
            vec![VisiblePoint {
                angle: angle(10),
                distance: 50.
            }]
        );
    }

    #[test]
    fn test_update_at_time_zero_is_visible() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        buffer.update(angle(0), 5., Duration::ZERO);
        assert_eq!(buffer.visible_points(Duration::ZERO).len(), 1);
    }

    #[test]
    fn test_update_rejects_invalid_distance() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        assert!(!buffer.update(angle(5), 0., secs(0.)));
        assert!(!buffer.update(angle(5), -2., secs(0.)));
        assert!(!buffer.update(angle(5), MAX + 0.1, secs(0.)));
        assert!(!buffer.update(angle(5), f64::NAN, secs(0.)));
        assert_eq!(buffer.sample(angle(5)).last_seen, None);
    }

    #[test]
    fn test_max_distance_reading_is_not_a_detection() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        assert!(buffer.update(angle(5), MAX, secs(0.)));
        assert!(buffer.visible_points(secs(0.)).is_empty());
    }

    #[test]
    fn test_points_are_ordered_by_angle() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        buffer.update(angle(120), 1., secs(0.));
        buffer.update(angle(3), 2., secs(0.));
        buffer.update(angle(60), 3., secs(0.));
        let angles: Vec<u8> = buffer
            .visible_points(secs(0.))
            .iter()
            .map(|p| p.angle.degrees())
            .collect();
        assert_eq!(angles, vec![3, 60, 120]);
    }

    #[test]
    fn test_fade_boundary() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        buffer.update(angle(45), 20., secs(1.));

        buffer.decay(secs(4.));
        assert_eq!(buffer.visible_points(secs(4.)).len(), 1);

        buffer.decay(secs(4.001));
        assert!(buffer.visible_points(secs(4.001)).is_empty());
        assert_eq!(buffer.sample(angle(45)).distance, MAX);
        assert_eq!(buffer.sample(angle(45)).last_seen, Some(secs(1.)));
    }

    #[test]
    fn test_visible_points_filters_stale_without_decay() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        buffer.update(angle(45), 20., secs(0.));
        assert!(buffer.visible_points(secs(10.)).is_empty());
        // Not mutated by the read
        assert_eq!(buffer.sample(angle(45)).distance, 20.);
    }

    #[test]
    fn test_refresh_after_decay() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        buffer.update(angle(45), 20., secs(0.));
        buffer.decay(secs(5.));
        buffer.update(angle(45), 25., secs(6.));
        assert_eq!(buffer.visible_points(secs(6.))[0].distance, 25.);
    }

    #[test]
    fn test_clear() {
        let mut buffer = SampleBuffer::new(FADE, MAX);
        for d in [0u8, 10, 90, 180] {
            buffer.update(angle(d), 10., secs(0.));
        }
        buffer.clear();
        assert!(buffer.visible_points(secs(0.)).is_empty());
        assert!(Angle::all().all(|a| buffer.sample(a).last_seen.is_none()));
    }

    proptest! {
        #[test]
        fn prop_update_is_visible_once(a in 0u8..=180, d in 0.001f64..MAX, t in 0u64..1_000_000) {
            let mut buffer = SampleBuffer::new(FADE, MAX);
            let now = Duration::from_millis(t);
            buffer.update(angle(a), d, now);
            let points = buffer.visible_points(now);
            prop_assert_eq!(points.len(), 1);
            prop_assert_eq!(points[0], VisiblePoint { angle: angle(a), distance: d });
        }

        #[test]
        fn prop_decay_law(a in 0u8..=180, d in 0.001f64..MAX, t in 0u64..1_000_000, eps in 1u64..10_000) {
            let mut buffer = SampleBuffer::new(FADE, MAX);
            let t0 = Duration::from_millis(t);
            buffer.update(angle(a), d, t0);
            let later = t0 + FADE + Duration::from_millis(eps);
            prop_assert!(buffer.visible_points(later).is_empty());

            buffer.decay(later);
            let once = buffer.clone();
            buffer.decay(later);
            prop_assert_eq!(once.samples, buffer.samples);
            prop_assert!(buffer.visible_points(later).is_empty());
        }
    }
}
