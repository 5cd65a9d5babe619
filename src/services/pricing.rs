//! Distance-based trip pricing.
//!
//! The base price is `base + distance * per_km`, never below the floor.
//! Real-driver offers get a small random jitter on top so otherwise identical
//! quotes are distinguishable; the jitter is clamped so the floor still holds.

use rand::Rng;

/// Fixed fare added to every trip.
pub const BASE_FARE: f64 = 2.50;

/// Per-kilometer rate.
pub const PER_KM_RATE: f64 = 1.10;

/// Minimum chargeable price regardless of distance.
pub const PRICE_FLOOR: f64 = 3.50;

/// Round to cents, half away from zero.
///
/// Half-cent amounts such as `4.515` are stored as `4.51499...`, so the
/// scaled value is nudged outward by a few ulps before rounding.
pub fn round_price(amount: f64) -> f64 {
    let cents = amount * 100.0;
    let nudge = (cents.abs() * 1e-12).max(1e-9);
    (cents + cents.signum() * nudge).round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    pub base_fare: f64,
    pub per_km_rate: f64,
    pub price_floor: f64,
    /// Maximum jitter in whole percent, applied symmetrically.
    pub jitter_pct: i32,
    /// Markup in percent for each fallback offer after the first.
    pub fallback_markup_pct: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            base_fare: BASE_FARE,
            per_km_rate: PER_KM_RATE,
            price_floor: PRICE_FLOOR,
            jitter_pct: 5,
            fallback_markup_pct: 5.0,
        }
    }
}

impl PricingPolicy {
    /// Floor-guaranteed price before rounding.
    pub fn raw_price(&self, distance_km: f64) -> f64 {
        (self.base_fare + distance_km * self.per_km_rate).max(self.price_floor)
    }

    /// Price for a trip of `distance_km`, rounded to cents.
    pub fn price(&self, distance_km: f64) -> f64 {
        round_price(self.raw_price(distance_km))
    }

    /// Apply a jitter of `noise_pct` percent to `amount`, keeping the floor.
    pub fn jittered_price(&self, amount: f64, noise_pct: i32) -> f64 {
        let jittered = amount * (1.0 + f64::from(noise_pct) / 100.0);
        round_price(jittered).max(self.price_floor)
    }

    /// Draw a jitter uniformly from `[-jitter_pct, jitter_pct]` and apply it
    /// to the unrounded base for a trip of `distance_km`.
    pub fn random_jittered_price<R: Rng>(&self, distance_km: f64, rng: &mut R) -> f64 {
        let noise = rng.gen_range(-self.jitter_pct..=self.jitter_pct);
        self.jittered_price(self.raw_price(distance_km), noise)
    }

    /// Fallback offer price: the base for the first entry, marked up after that.
    pub fn fallback_price(&self, base_price: f64, index: usize) -> f64 {
        if index == 0 {
            base_price
        } else {
            round_price(base_price * (1.0 + self.fallback_markup_pct / 100.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_zero_distance_hits_floor() {
        assert_eq!(PricingPolicy::default().price(0.0), 3.50);
    }

    #[test]
    fn test_long_trip_follows_formula() {
        assert_eq!(PricingPolicy::default().price(100.0), 112.50);
    }

    #[test]
    fn test_price_never_below_floor() {
        let policy = PricingPolicy::default();
        for d in [0.0, 0.1, 0.5, 0.9, 0.909, 1.0, 3.7, 42.0, 1234.5] {
            assert!(policy.price(d) >= PRICE_FLOOR, "distance {d}");
        }
    }

    #[test]
    fn test_price_is_rounded_to_cents() {
        // 2.50 + 3.333 * 1.10 = 6.1663
        assert_eq!(PricingPolicy::default().price(3.333), 6.17);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_price(2.125), 2.13);
        assert_eq!(round_price(-2.125), -2.13);
        assert_eq!(round_price(1.005), 1.01);
        assert_eq!(round_price(0.0), 0.0);
    }

    #[test]
    fn test_fallback_markup() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.fallback_price(10.0, 0), 10.0);
        assert_eq!(policy.fallback_price(10.0, 1), 10.5);
        assert_eq!(policy.fallback_price(3.5, 1), 3.68);
    }

    #[test]
    fn test_fallback_markup_rounds_half_cents_up() {
        let policy = PricingPolicy::default();
        // 4.30 * 1.05 = 4.515, 17.90 * 1.05 = 18.795
        assert_eq!(policy.fallback_price(4.30, 1), 4.52);
        assert_eq!(policy.fallback_price(17.90, 1), 18.80);
    }

    #[test]
    fn test_jitter_applies_to_unrounded_base() {
        let policy = PricingPolicy::default();
        // 2.50 + 3.333 * 1.10 = 6.1663; * 1.05 = 6.474615.
        // Jittering the rounded 6.17 would give 6.48 instead.
        assert_eq!(policy.jittered_price(policy.raw_price(3.333), 5), 6.47);
        assert_eq!(policy.jittered_price(4.444, 5), 4.67);
    }

    #[test]
    fn test_jitter_stays_within_range_and_floor() {
        let policy = PricingPolicy::default();
        for noise in -5..=5 {
            let p = policy.jittered_price(20.0, noise);
            assert!((19.0..=21.0).contains(&p), "got {p}");

            let low = policy.jittered_price(PRICE_FLOOR, noise);
            assert!(low >= PRICE_FLOOR, "got {low}");
        }

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            // 2.50 + 15.0 * 1.10 = 19.0
            let p = policy.random_jittered_price(15.0, &mut rng);
            assert!((18.05..=19.95).contains(&p), "got {p}");

            let low = policy.random_jittered_price(0.0, &mut rng);
            assert!(low >= PRICE_FLOOR, "got {low}");
        }
    }

    #[test]
    fn test_seeded_jitter_matches_a_whole_percent_of_raw_base() {
        let policy = PricingPolicy::default();
        let raw = policy.raw_price(3.333);
        let allowed: Vec<f64> = (-5..=5).map(|n| policy.jittered_price(raw, n)).collect();

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let p = policy.random_jittered_price(3.333, &mut rng);
            assert!(allowed.contains(&p), "got {p}");
        }
    }

    #[test]
    fn test_jitter_is_deterministic_for_seed() {
        let policy = PricingPolicy::default();
        let a: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..5).map(|_| policy.random_jittered_price(8.6, &mut rng)).collect()
        };
        let b: Vec<f64> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..5).map(|_| policy.random_jittered_price(8.6, &mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
