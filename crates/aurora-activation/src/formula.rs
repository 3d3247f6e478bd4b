use chrono::{DateTime, Utc};

use aurora_core::chunk::ChunkType;
use aurora_core::config::ActivationConfig;

/// What is known about a chunk's past accesses.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessHistory {
    /// Every access time. Order does not matter.
    Timestamps(Vec<DateTime<Utc>>),
    /// Only a count and the first and last access times are known.
    Summary {
        access_count: u64,
        first_access: DateTime<Utc>,
        last_access: DateTime<Utc>,
    },
}

/// Parameters of the base-level equation for one chunk type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayParams {
    /// Decay exponent `d`.
    pub decay_rate: f64,
    /// Only the most recent N accesses count.
    pub max_history: usize,
    /// Floor for elapsed seconds.
    pub min_elapsed_secs: f64,
    /// Result for an empty history.
    pub min_activation: f64,
}

impl DecayParams {
    pub fn for_type(config: &ActivationConfig, chunk_type: ChunkType) -> Self {
        Self {
            decay_rate: config.decay_rate_for(chunk_type),
            max_history: config.max_history,
            min_elapsed_secs: config.min_elapsed_secs,
            min_activation: config.min_activation,
        }
    }

    pub fn with_decay_rate(config: &ActivationConfig, decay_rate: f64) -> Self {
        Self {
            decay_rate,
            max_history: config.max_history,
            min_elapsed_secs: config.min_elapsed_secs,
            min_activation: config.min_activation,
        }
    }

    fn elapsed(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let secs = (now - at).num_milliseconds() as f64 / 1_000.0;
        secs.max(self.min_elapsed_secs)
    }
}

impl Default for DecayParams {
    fn default() -> Self {
        Self::for_type(&ActivationConfig::default(), ChunkType::Code)
    }
}

/// ACT-R base-level activation as of `now`.
///
/// ```text
/// BLA = ln( Σ t_i^-d )
/// ```
///
/// `t_i` is seconds since access `i`, floored at `min_elapsed_secs`. With only
/// a [`AccessHistory::Summary`], Petrov's (2006) hybrid approximation is used:
/// the most recent access is exact and the remaining `n - 1` are treated as
/// evenly spread over the chunk's lifetime `L`:
///
/// ```text
/// BLA = ln( t_1^-d + (n-1) · (L^(1-d) - t_1^(1-d)) / ((1-d) · (L - t_1)) )
/// ```
pub fn calculate_decay(history: &AccessHistory, params: &DecayParams, now: DateTime<Utc>) -> f64 {
    match history {
        AccessHistory::Timestamps(times) => from_timestamps(times, params, now),
        AccessHistory::Summary {
            access_count,
            first_access,
            last_access,
        } => from_summary(*access_count, *first_access, *last_access, params, now),
    }
}

/// Fold a persisted base level into a decayed activation as one more term of
/// the sum: `ln(e^base_level + e^activation)`.
///
/// Keeps both monotonicity properties of [`calculate_decay`] and orders
/// otherwise identical histories by their base level.
pub fn with_prior(base_level: f64, activation: f64) -> f64 {
    let (hi, lo) = if base_level >= activation {
        (base_level, activation)
    } else {
        (activation, base_level)
    };
    if !lo.is_finite() {
        return hi;
    }
    hi + (lo - hi).exp().ln_1p()
}

fn from_timestamps(times: &[DateTime<Utc>], params: &DecayParams, now: DateTime<Utc>) -> f64 {
    if times.is_empty() || params.max_history == 0 {
        return params.min_activation;
    }
    let mut elapsed: Vec<f64> = times.iter().map(|t| params.elapsed(*t, now)).collect();
    elapsed.sort_by(|a, b| a.total_cmp(b));
    elapsed.truncate(params.max_history);

    let sum: f64 = elapsed.iter().map(|t| t.powf(-params.decay_rate)).sum();
    sum.ln()
}

fn from_summary(
    access_count: u64,
    first_access: DateTime<Utc>,
    last_access: DateTime<Utc>,
    params: &DecayParams,
    now: DateTime<Utc>,
) -> f64 {
    let n = access_count.min(params.max_history as u64);
    if n == 0 {
        return params.min_activation;
    }
    let d = params.decay_rate;
    let t1 = params.elapsed(last_access, now);
    let lifetime = params.elapsed(first_access, now).max(t1);

    let recent = t1.powf(-d);
    if n == 1 {
        return recent.ln();
    }

    let rest = (n - 1) as f64;
    let span = lifetime - t1;
    let mean = if span <= f64::EPSILON * lifetime {
        recent
    } else {
        // ln(L / t_1), computed without cancellation for L close to t_1.
        let log_ratio = (span / t1).ln_1p();
        let e = 1.0 - d;
        if e.abs() < 1e-9 {
            // ∫ t^-1 dt = ln t
            log_ratio / span
        } else {
            // L^e - t_1^e = t_1^e · (exp(e · ln(L/t_1)) - 1)
            t1.powf(e) * (e * log_ratio).exp_m1() / (e * span)
        }
    };

    (recent + rest * mean).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn params(d: f64) -> DecayParams {
        DecayParams {
            decay_rate: d,
            ..DecayParams::default()
        }
    }

    #[test]
    fn single_access_matches_closed_form() {
        let now = Utc::now();
        let h = AccessHistory::Timestamps(vec![now - Duration::seconds(100)]);
        let expected = (100f64).powf(-0.5).ln();
        assert!((calculate_decay(&h, &params(0.5), now) - expected).abs() < 1e-9);
    }

    #[test]
    fn sum_over_accesses() {
        let now = Utc::now();
        let h = AccessHistory::Timestamps(vec![
            now - Duration::seconds(10),
            now - Duration::seconds(1_000),
        ]);
        let expected = (10f64.powf(-0.5) + 1_000f64.powf(-0.5)).ln();
        assert!((calculate_decay(&h, &params(0.5), now) - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_history_is_min_activation() {
        let now = Utc::now();
        let p = params(0.5);
        assert_eq!(calculate_decay(&AccessHistory::Timestamps(vec![]), &p, now), -10.0);
        let none = AccessHistory::Summary {
            access_count: 0,
            first_access: now,
            last_access: now,
        };
        assert_eq!(calculate_decay(&none, &p, now), -10.0);
    }

    #[test]
    fn zero_elapsed_is_floored() {
        let now = Utc::now();
        let h = AccessHistory::Timestamps(vec![now, now + Duration::seconds(30)]);
        // Both floored to 1s: ln(1 + 1) = ln 2.
        assert!((calculate_decay(&h, &params(0.5), now) - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn only_recent_history_counts() {
        let now = Utc::now();
        let p = DecayParams {
            max_history: 2,
            ..params(0.5)
        };
        let recent = vec![now - Duration::seconds(5), now - Duration::seconds(6)];
        let mut all = recent.clone();
        all.push(now - Duration::days(30));
        assert_eq!(
            calculate_decay(&AccessHistory::Timestamps(all), &p, now),
            calculate_decay(&AccessHistory::Timestamps(recent), &p, now)
        );
    }

    #[test]
    fn summary_with_coincident_accesses_equals_exact_sum() {
        let now = Utc::now();
        let at = now - Duration::seconds(400);
        let summary = AccessHistory::Summary {
            access_count: 3,
            first_access: at,
            last_access: at,
        };
        let exact = AccessHistory::Timestamps(vec![at, at, at]);
        let p = params(0.5);
        assert!((calculate_decay(&summary, &p, now) - calculate_decay(&exact, &p, now)).abs() < 1e-9);
    }

    #[test]
    fn summary_handles_unit_decay() {
        let now = Utc::now();
        let h = AccessHistory::Summary {
            access_count: 2,
            first_access: now - Duration::seconds(100),
            last_access: now - Duration::seconds(10),
        };
        let expected = (1.0 / 10.0 + (100f64.ln() - 10f64.ln()) / 90.0).ln();
        assert!((calculate_decay(&h, &params(1.0), now) - expected).abs() < 1e-9);
    }

    #[test]
    fn prior_is_a_log_sum() {
        let expected = (0.5f64.exp() + (-1.0f64).exp()).ln();
        assert!((with_prior(0.5, -1.0) - expected).abs() < 1e-12);
        assert_eq!(with_prior(0.5, -1.0), with_prior(-1.0, 0.5));
        assert_eq!(with_prior(3.0, f64::NEG_INFINITY), 3.0);
    }

    #[test]
    fn higher_prior_wins_for_equal_history() {
        let recency = (60f64).powf(-0.5).ln();
        assert!(with_prior(5.0, recency) > with_prior(0.5, recency));
        assert!(with_prior(0.5, recency) > with_prior(-5.0, recency));
        assert!(with_prior(-5.0, recency) > recency);
    }

    #[test]
    fn aggressive_decays_faster_than_gentle() {
        let now = Utc::now();
        let h = AccessHistory::Timestamps(vec![now - Duration::hours(5)]);
        assert!(calculate_decay(&h, &params(0.7), now) < calculate_decay(&h, &params(0.3), now));
    }
}
