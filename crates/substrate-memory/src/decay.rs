//! Activation and association decay (`spec.md` §4.B). `cortex-decay`'s own
//! `factors::temporal::calculate` names itself a half-life but actually
//! computes mean-lifetime decay (`e^(-t/h)`); true half-life decay halves
//! every `half_life` elapsed, so this crate uses `0.5^(t/h)` instead.
//!
//! `half_life_factor(h, h) == 0.5` for any `h`, which `e^(-t/h)` does not
//! satisfy (`e^-1 ≈ 0.368`).

use chrono::{DateTime, Utc};

/// True half-life decay factor for elapsed time against a half-life, both in
/// days. Returns a value in `(0.0, 1.0]`.
pub fn half_life_factor(elapsed_days: f64, half_life_days: f64) -> f64 {
    if half_life_days <= 0.0 {
        return 1.0;
    }
    0.5_f64.powf(elapsed_days.max(0.0) / half_life_days)
}

/// Decay a thought's activation by elapsed time since `last_accessed`.
pub fn decay_activation(activation: f64, last_accessed: DateTime<Utc>, now: DateTime<Utc>, half_life_days: f64) -> f64 {
    let elapsed_days = (now - last_accessed).num_seconds().max(0) as f64 / 86400.0;
    (activation * half_life_factor(elapsed_days, half_life_days)).clamp(0.0, 1.0)
}

/// Decay an association's weight by elapsed time since it was last touched.
pub fn decay_weight(weight: f64, elapsed_days: f64, half_life_days: f64) -> f64 {
    (weight * half_life_factor(elapsed_days, half_life_days)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Invariant 1 (`spec.md` §8): activation stays in [0,1] regardless of
        // starting activation, elapsed time, or half-life.
        #[test]
        fn decayed_activation_stays_in_unit_range(
            activation in -2.0f64..3.0,
            elapsed_days in 0i64..10_000,
            half_life_days in 0.01f64..365.0,
        ) {
            let now = Utc::now();
            let last = now - chrono::Duration::days(elapsed_days);
            let decayed = decay_activation(activation, last, now, half_life_days);
            prop_assert!((0.0..=1.0).contains(&decayed), "activation {decayed} out of [0,1]");
        }

        #[test]
        fn decayed_weight_stays_in_unit_range(
            weight in -1.0f64..2.0,
            elapsed_days in 0.0f64..10_000.0,
            half_life_days in 0.01f64..365.0,
        ) {
            let decayed = decay_weight(weight, elapsed_days, half_life_days);
            prop_assert!((0.0..=1.0).contains(&decayed), "weight {decayed} out of [0,1]");
        }
    }
}
