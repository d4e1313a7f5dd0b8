use crate::data::series::PriceSeries;

/// Fills the `ma` column with the simple moving average of the closing
/// price. The first `window - 1` rows stay `None`.
pub fn add_moving_average(mut series: PriceSeries, window: usize) -> PriceSeries {
    series.indicators.ma = rolling_mean(&series.closes(), window);
    series.indicators.ma_window = Some(window);
    series
}

/// Fills the `bb_high`/`bb_mid`/`bb_low` columns.
///
/// The mid band is the SMA of the closing price over `window`; the outer
/// bands are offset by `std_dev` times the population standard deviation of
/// the same window (`variance = E[X²] - mean²`). Rows without a full window
/// of history stay `None`. Only the closing price feeds the bands; the other
/// columns pass through untouched.
pub fn add_bollinger_bands(mut series: PriceSeries, window: usize, std_dev: f64) -> PriceSeries {
    let closes = series.closes();
    let mid = rolling_mean(&closes, window);
    let sigma = rolling_std_dev(&closes, window);

    series.indicators.bb_high = mid
        .iter()
        .zip(&sigma)
        .map(|(m, s)| Some(m.as_ref()? + std_dev * s.as_ref()?))
        .collect();
    series.indicators.bb_low = mid
        .iter()
        .zip(&sigma)
        .map(|(m, s)| Some(m.as_ref()? - std_dev * s.as_ref()?))
        .collect();
    series.indicators.bb_mid = mid;
    series.indicators.bb_window = Some(window);
    series
}

fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let mut out = vec![None; window - 1];
    for i in (window - 1)..values.len() {
        let sum: f64 = values[(i + 1 - window)..=i].iter().sum();
        out.push(Some(sum / window as f64));
    }
    out
}

fn rolling_std_dev(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let mut out = vec![None; window - 1];
    for i in (window - 1)..values.len() {
        let slice = &values[(i + 1 - window)..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / window as f64;
        out.push(Some(variance.max(0.0).sqrt()));
    }
    out
}
