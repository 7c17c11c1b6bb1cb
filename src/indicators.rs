/// Computes a trailing simple moving average with a sliding-window sum.
///
/// Entries before index `window - 1` have no value because the window is not
/// yet full.
///
/// # Arguments
/// * `prices` - Prices in chronological order.
/// * `window` - Number of periods averaged; must be positive.
///
/// # Returns
/// * `anyhow::Result<Vec<Option<f64>>>` - One entry per input price.
pub fn simple_moving_average(prices: &[f64], window: usize) -> anyhow::Result<Vec<Option<f64>>> {
    anyhow::ensure!(window > 0, "SMA window must be a positive integer");

    let mut sma_values = Vec::with_capacity(prices.len());
    let mut window_sum = 0.0;
    for (i, price) in prices.iter().enumerate() {
        window_sum += price;
        if i >= window {
            window_sum -= prices[i - window];
        }
        if i + 1 < window {
            sma_values.push(None);
        } else {
            sma_values.push(Some(window_sum / window as f64));
        }
    }

    Ok(sma_values)
}

/// Computes day-over-day percentage returns, rounded to two decimals.
///
/// Each return is measured against the last day that itself produced a
/// valid return (day 0 initially). A day whose price is NaN, or whose
/// reference price is NaN or zero, gets `None` and does not move the
/// reference forward.
pub fn daily_returns(prices: &[f64]) -> Vec<Option<f64>> {
    if prices.is_empty() {
        return Vec::new();
    }

    let mut returns = Vec::with_capacity(prices.len());
    returns.push(None);

    let mut last_valid_idx = 0;
    for i in 1..prices.len() {
        let curr = prices[i];
        let prev = prices[last_valid_idx];
        if curr.is_nan() || prev.is_nan() || prev == 0.0 {
            returns.push(None);
        } else {
            let change = (curr - prev) / prev * 100.0;
            returns.push(Some(round_to_cents(change)));
            last_valid_idx = i;
        }
    }

    returns
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
