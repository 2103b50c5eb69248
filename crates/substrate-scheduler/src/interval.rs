//! Interval adaptation formula (`spec.md` §4.E):
//! `adapted = base * f_type * f_mood * f_recency * jitter`.

use rand::Rng;
use substrate_core::types::{JobState, Mood};

/// Per-job-type multiplier, itself mood-sensitive (`spec.md` §4.E): dreams
/// and reflection stretch their interval as calm rises; existential
/// questioning shortens its interval as tension rises. Reactive kinds (e.g.
/// "pulse") and unknown types are left unscaled by mood.
pub fn type_factor(job_type: &str, mood: &Mood) -> f64 {
    match job_type {
        "dream" | "reflection" => (1.0 + 0.4 * mood.get("calm")).clamp(1.0, 1.4),
        "existential" => (1.0 - 0.4 * mood.get("tension")).clamp(0.6, 1.0),
        "monologue" => 1.0,
        "pulse" => 0.8,
        _ => 1.0,
    }
}

/// Mood-driven multiplier: higher curiosity speeds up exploratory jobs,
/// higher tension speeds up everything, higher calm slows everything down.
pub fn mood_factor(mood: &Mood) -> f64 {
    let curiosity = mood.get("curiosity");
    let calm = mood.get("calm");
    let tension = mood.get("tension");
    let speedup = (curiosity + tension) / 2.0;
    let slowdown = calm;
    (1.0 - 0.5 * speedup + 0.5 * slowdown).clamp(0.4, 1.8)
}

/// Recency multiplier from the job's recent signal mean: a job whose recent
/// runs were unproductive (`mean` near 0) slows down; a consistently
/// productive job (`mean` near 1) speeds up.
pub fn recency_factor(job: &JobState) -> f64 {
    let mean = job.recent_signal_mean();
    (1.5 - mean).clamp(0.5, 1.5)
}

/// Compute the next adapted interval for `job`, including jitter in
/// `[jitter_min, jitter_max]`.
pub fn adapt_interval(job: &JobState, mood: &Mood, jitter_min: f64, jitter_max: f64, rng: &mut impl Rng) -> f64 {
    let jitter = rng.gen_range(jitter_min..=jitter_max);
    job.base_interval_secs * type_factor(&job.name, mood) * mood_factor(mood) * recency_factor(job) * jitter
}
