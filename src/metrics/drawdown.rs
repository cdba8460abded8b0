//! Peak-to-trough drawdown over an equity curve.

/// Largest decline from a running peak to a later point of `curve`.
///
/// The curve is a chronological running P&L, normally starting at 0.
pub fn max_drawdown(curve: &[f64]) -> f64 {
    let Some(&first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0f64;

    for &equity in curve {
        if equity > peak {
            peak = equity;
        }

        let dd = peak - equity;
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_curve() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[0.0]), 0.0);
    }

    #[test]
    fn test_peak_to_trough() {
        // Peak 20 falls to 2
        assert_eq!(max_drawdown(&[0.0, 10.0, 5.0, 20.0, 2.0]), 18.0);
    }

    #[test]
    fn test_losses_from_start() {
        // Equity never rises above the opening 0
        assert_eq!(max_drawdown(&[0.0, -5.0, -12.0, -3.0]), 12.0);
    }

    #[test]
    fn test_monotonic_gains_have_no_drawdown() {
        assert_eq!(max_drawdown(&[0.0, 1.0, 4.0, 9.0]), 0.0);
    }
}
