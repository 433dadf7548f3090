//! Blob motion model
//!
//! Each blob drifts between random waypoints in normalized device space.
//! A blob owns its own motion segment (source/target endpoints plus the
//! timestamps bounding them); one `update(now)` sweep retargets expired
//! segments and re-derives every position. No timers, no callbacks.

use crate::util::{hsv_to_rgb, smoothstep, Rng};

/// One animated shape with its own motion timeline
pub struct Blob {
    /// RGB channels in [0, 1], fixed at creation
    pub color: [f32; 3],
    /// Current position in NDC, derived on every update
    pub position: [f32; 2],
    position_source: [f32; 2],
    position_target: [f32; 2],
    time_source: i64,
    time_target: i64,
}

/// The fixed collection of blobs and the RNG driving their waypoints
pub struct BlobSet {
    blobs: Vec<Blob>,
    rng: Rng,
    travel_ms: (i64, i64),
}

impl BlobSet {
    /// Create `count` blobs, each with a random full-saturation hue.
    ///
    /// Motion state starts zeroed with `time_target` already expired, so the
    /// first `update` call immediately schedules a real segment for every
    /// blob.
    pub fn new(count: usize, travel_ms: (i64, i64), mut rng: Rng) -> Self {
        let blobs = (0..count)
            .map(|_| {
                let (r, g, b) = hsv_to_rgb(rng.range_f32(0.0, 360.0), 1.0, 1.0);
                Blob {
                    color: [r, g, b],
                    position: [0.0, 0.0],
                    position_source: [0.0, 0.0],
                    position_target: [0.0, 0.0],
                    time_source: 0,
                    time_target: 0,
                }
            })
            .collect();

        Self {
            blobs,
            rng,
            travel_ms,
        }
    }

    /// Advance every blob to time `now` (milliseconds, monotonic).
    ///
    /// A blob whose segment has expired hands its target over as the new
    /// source (no positional jump) and draws a fresh waypoint uniformly from
    /// [-1,1]².
    pub fn update(&mut self, now: i64) {
        let (travel_min, travel_max) = self.travel_ms;

        for blob in &mut self.blobs {
            if now >= blob.time_target {
                blob.time_source = now;
                blob.time_target = now + self.rng.range_i64(travel_min, travel_max);
                blob.position_source = blob.position_target;
                blob.position_target = [
                    self.rng.range_f32(-1.0, 1.0),
                    self.rng.range_f32(-1.0, 1.0),
                ];
            }

            let span = (blob.time_target - blob.time_source) as f32;
            let u = ((now - blob.time_source) as f32 / span).clamp(0.0, 1.0);
            let eased = smoothstep(u);
            for i in 0..2 {
                blob.position[i] = blob.position_source[i]
                    + (blob.position_target[i] - blob.position_source[i]) * eased;
            }
        }
    }

    /// All blobs, in creation order
    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(count: usize) -> BlobSet {
        BlobSet::new(count, (8000, 12000), Rng::new(0xB10B_5EED))
    }

    #[test]
    fn test_first_update_retargets_every_blob() {
        let mut blobs = set(3);
        blobs.update(0);
        for blob in blobs.blobs() {
            assert!(blob.time_target > 0);
            assert!(blob.time_target - blob.time_source >= 8000);
            assert!(blob.time_target - blob.time_source < 12000);
        }
    }

    #[test]
    fn test_position_stays_inside_segment_box() {
        let mut blobs = set(5);
        for step in 0..2000 {
            blobs.update(step * 50);
            for blob in blobs.blobs() {
                for i in 0..2 {
                    let lo = blob.position_source[i].min(blob.position_target[i]);
                    let hi = blob.position_source[i].max(blob.position_target[i]);
                    assert!(blob.position[i] >= lo && blob.position[i] <= hi);
                }
            }
        }
    }

    #[test]
    fn test_retarget_is_continuous() {
        let mut blobs = set(3);
        blobs.update(0);
        let old_targets: Vec<[f32; 2]> = blobs.blobs().iter().map(|b| b.position_target).collect();
        let latest_expiry = blobs.blobs().iter().map(|b| b.time_target).max().unwrap();

        let now = latest_expiry;
        blobs.update(now);
        for (blob, old_target) in blobs.blobs().iter().zip(&old_targets) {
            // Segment handoff: the previous target becomes the new source,
            // exactly, and the new deadline lies strictly in the future.
            assert_eq!(blob.position_source, *old_target);
            assert!(blob.time_target > now);
        }
    }

    #[test]
    fn test_blob_sits_on_former_target_at_expiry() {
        let mut blobs = set(3);
        blobs.update(0);
        let targets: Vec<[f32; 2]> = blobs.blobs().iter().map(|b| b.position_target).collect();
        let expiries: Vec<i64> = blobs.blobs().iter().map(|b| b.time_target).collect();

        for (i, expiry) in expiries.iter().enumerate() {
            let mut probe = set(3);
            probe.update(0);
            probe.update(*expiry);
            let blob = &probe.blobs()[i];
            for k in 0..2 {
                assert!((blob.position[k] - targets[i][k]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_motion_is_deterministic_for_a_seed() {
        let mut a = set(4);
        let mut b = set(4);
        for step in 0..100 {
            a.update(step * 137);
            b.update(step * 137);
        }
        for (ba, bb) in a.blobs().iter().zip(b.blobs()) {
            assert_eq!(ba.position, bb.position);
            assert_eq!(ba.color, bb.color);
        }
    }

    #[test]
    fn test_colors_are_full_value_hues() {
        let blobs = set(32);
        for blob in blobs.blobs() {
            let max = blob.color[0].max(blob.color[1]).max(blob.color[2]);
            let min = blob.color[0].min(blob.color[1]).min(blob.color[2]);
            assert!((max - 1.0).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&min));
        }
    }

    #[test]
    fn test_monotonic_time_between_expiries_keeps_segment() {
        let mut blobs = set(1);
        blobs.update(0);
        let target = blobs.blobs()[0].position_target;
        let deadline = blobs.blobs()[0].time_target;

        blobs.update(deadline / 2);
        assert_eq!(blobs.blobs()[0].position_target, target);
    }
}
