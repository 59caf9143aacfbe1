use super::Candle;

/// Value emitted while the lookback window is not yet filled.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Relative Strength Index over a fixed lookback.
///
/// Each index is recomputed from scratch over its trailing window, without
/// Wilder/EMA smoothing, so every value depends only on the `period` deltas
/// ending at that index. Cost is O(n·period).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsiEngine {
    period: usize,
}

impl Default for RsiEngine {
    fn default() -> Self {
        Self::new(14)
    }
}

impl RsiEngine {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI series parallel to `closes`.
    ///
    /// Indices below `period` hold [`NEUTRAL_RSI`]. A window without any loss
    /// scores 100; the loss average is never used as a zero divisor.
    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let period = self.period;
        if period == 0 {
            return vec![NEUTRAL_RSI; closes.len()];
        }

        (0..closes.len())
            .map(|i| {
                if i < period {
                    return NEUTRAL_RSI;
                }
                let (gains, losses) = closes[i + 1 - period..=i]
                    .iter()
                    .zip(&closes[i - period..i])
                    .map(|(current, previous)| current - previous)
                    .fold((0.0, 0.0), |(gains, losses), delta| {
                        if delta > 0.0 { (gains + delta, losses) } else { (gains, losses - delta) }
                    });

                let avg_gain = gains / period as f64;
                let avg_loss = losses / period as f64;
                if avg_loss == 0.0 {
                    return 100.0;
                }
                let rs = avg_gain / avg_loss;
                (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
            })
            .collect()
    }

    pub fn compute_candles(&self, candles: &[Candle]) -> Vec<f64> {
        let closes: Vec<f64> = candles.iter().map(Candle::close).collect();
        self.compute(&closes)
    }
}
