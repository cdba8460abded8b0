//! Normalized sub-scores feeding the composite trader score.
//!
//! Every function here is total: undefined logarithms, empty samples and
//! zero denominators resolve to a fixed neutral value instead of NaN.

/// Profit curve anchors `(pnl, score)`, log-interpolated between neighbours.
const PROFIT_CURVE: [(f64, f64); 9] = [
    (1.0, 0.25),
    (100.0, 0.40),
    (1_000.0, 0.60),
    (5_000.0, 0.75),
    (10_000.0, 0.85),
    (50_000.0, 0.92),
    (100_000.0, 0.98),
    (500_000.0, 0.999),
    (1_000_000.0, 1.0),
];

/// Score at zero P&L; the sub-unit segment rises linearly to the first anchor.
const ZERO_PNL_SCORE: f64 = 0.15;

/// Loss curve anchors `(|pnl|, score)`.
const LOSS_CURVE: [(f64, f64); 4] = [
    (10.0, 0.20),
    (100.0, 0.15),
    (1_000.0, 0.10),
    (10_000.0, 0.05),
];

/// Loss at which the tail of the loss curve reaches zero.
const LOSS_CEILING: f64 = 1_000_000.0;

/// Trades at which confidence reaches `1 - 1/e`.
const CONFIDENCE_SCALE: f64 = 16.0;
const CONFIDENCE_EXPONENT: f64 = 0.6;

const ROI_STEEPNESS: f64 = 0.6;

/// Markets per loss sampled by the risk score.
const RISK_SAMPLE_DIVISOR: u32 = 10;

/// Interpolate `x` on a logarithmic axis between `(x_min, s_min)` and `(x_max, s_max)`.
///
/// Clamps to the end scores outside the domain and falls back to `s_min`
/// when a logarithm would be undefined.
pub fn log_interpolate(x: f64, x_min: f64, x_max: f64, s_min: f64, s_max: f64) -> f64 {
    if x_min <= 0.0 || x_max <= x_min || x.is_nan() {
        return s_min;
    }
    if x <= x_min {
        return s_min;
    }
    if x >= x_max {
        return s_max;
    }

    let span = x_max.ln() - x_min.ln();
    let t = (x.ln() - x_min.ln()) / span;
    if !t.is_finite() {
        return s_min;
    }

    s_min + (s_max - s_min) * t
}

/// Walk a piecewise log curve; `x` is expected to lie within the anchors.
fn interpolate_curve(x: f64, curve: &[(f64, f64)]) -> f64 {
    for pair in curve.windows(2) {
        let (x0, s0) = pair[0];
        let (x1, s1) = pair[1];
        if x <= x1 {
            return log_interpolate(x, x0, x1, s0, s1);
        }
    }
    curve.last().map(|&(_, s)| s).unwrap_or(0.0)
}

/// Map signed total P&L onto `[0, 1]`.
///
/// Gains climb a log curve that saturates at 1.0 from one million USDC up.
/// Losses fall from 0.20 toward 0 along a separate, steeper curve.
pub fn pnl_score(pnl: f64) -> f64 {
    if pnl.is_nan() {
        return 0.0;
    }

    if pnl >= 0.0 {
        let (first_x, first_s) = PROFIT_CURVE[0];
        let (last_x, last_s) = PROFIT_CURVE[PROFIT_CURVE.len() - 1];

        if pnl >= last_x {
            return last_s;
        }
        if pnl < first_x {
            return ZERO_PNL_SCORE + (first_s - ZERO_PNL_SCORE) * pnl / first_x;
        }
        return interpolate_curve(pnl, &PROFIT_CURVE);
    }

    let loss = pnl.abs();
    let (tail_x, tail_s) = LOSS_CURVE[LOSS_CURVE.len() - 1];

    if loss <= tail_x {
        return interpolate_curve(loss, &LOSS_CURVE);
    }

    let decay = (loss / tail_x).ln() / (LOSS_CEILING / tail_x).ln();
    (tail_s * (1.0 - decay)).max(0.0)
}

/// Average of the largest losses relative to total stake.
///
/// Returns `None` when fewer than ten markets were traded. Samples
/// `floor(total_trades / 10)` of the largest absolute losses.
pub fn risk_score(losses: &[f64], total_stake: f64, total_trades: u32) -> Option<f64> {
    if total_trades < RISK_SAMPLE_DIVISOR {
        return None;
    }
    if losses.is_empty() || total_stake <= 0.0 {
        return Some(0.0);
    }

    let mut magnitudes: Vec<f64> = losses.iter().map(|l| l.abs()).collect();
    magnitudes.sort_by(|a, b| b.total_cmp(a));

    let k = (total_trades / RISK_SAMPLE_DIVISOR) as usize;
    let sample = &magnitudes[..k.min(magnitudes.len())];
    let mean = sample.iter().sum::<f64>() / sample.len() as f64;

    Some(mean / total_stake)
}

/// Equal blend of count-based and stake-weighted win rates (both fractions).
pub fn win_score(win_rate_by_count: f64, win_rate_by_stake: f64) -> f64 {
    0.5 * win_rate_by_count + 0.5 * win_rate_by_stake
}

/// Sample-size confidence: `1 - exp(-(n/16)^0.6)`.
pub fn confidence_score(n: f64) -> f64 {
    if n <= 0.0 || n.is_nan() {
        return 0.0;
    }
    1.0 - (-(n / CONFIDENCE_SCALE).powf(CONFIDENCE_EXPONENT)).exp()
}

/// Squash a fractional ROI onto `[0, 1]` around a neutral 0.5.
pub fn roi_score(roi: f64) -> f64 {
    let signed_log = roi.signum() * roi.abs().ln_1p();
    let score = (1.0 + (ROI_STEEPNESS * signed_log).tanh()) / 2.0;

    if score.is_finite() {
        score
    } else {
        0.5
    }
}
