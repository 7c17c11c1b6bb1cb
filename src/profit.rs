/// A single buy-then-sell round trip over a price series.
///
/// Day indices refer to positions in the scanned slice; prices are copied
/// from those positions so a report can be rendered without the input.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Transaction {
    pub buy_day: usize,
    pub sell_day: usize,
    pub buy_price: f64,
    pub sell_price: f64,
}

impl Transaction {
    pub fn profit(&self) -> f64 {
        self.sell_price - self.buy_price
    }
}

/// Outcome of a max-profit scan: total profit and the trades realizing it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ScanResult {
    pub total_profit: f64,
    pub transactions: Vec<Transaction>,
}

/// Cursor position of the scanner.
#[derive(Debug, Clone, Copy)]
enum ScanState {
    SeekingBuy(usize),
    SeekingSell { buy_day: usize, cursor: usize },
    Done,
}

/// Computes the maximum profit obtainable with any number of non-overlapping
/// buy-then-sell trades, together with the trades that realize it.
///
/// Buys happen at each local minimum and sells at the following local
/// maximum, found in one left-to-right pass. Flat runs are absorbed into
/// whichever side they adjoin, so no zero-profit trade is ever emitted.
///
/// # Arguments
/// * `prices` - One price per trading period, in chronological order.
///
/// # Returns
/// * `ScanResult` - `(0, [])` when fewer than two prices are given.
///
/// # Examples
///
/// ```
/// let result = price_scan::profit::scan(&[7.0, 1.0, 5.0, 3.0, 6.0, 4.0]);
/// assert_eq!(result.total_profit, 7.0);
/// assert_eq!(result.transactions.len(), 2);
/// ```
pub fn scan(prices: &[f64]) -> ScanResult {
    let mut result = ScanResult::default();
    let n = prices.len();
    if n < 2 {
        return result;
    }
    let last = n - 1;

    let mut state = ScanState::SeekingBuy(0);
    loop {
        state = match state {
            ScanState::SeekingBuy(mut i) => {
                while i < last && prices[i + 1] <= prices[i] {
                    i += 1;
                }
                if i >= last {
                    ScanState::Done
                } else {
                    ScanState::SeekingSell { buy_day: i, cursor: i + 1 }
                }
            }
            ScanState::SeekingSell { buy_day, mut cursor } => {
                // invariant: prices[cursor] >= prices[cursor - 1]
                while cursor < last && prices[cursor + 1] >= prices[cursor] {
                    cursor += 1;
                }
                let trade = Transaction {
                    buy_day,
                    sell_day: cursor,
                    buy_price: prices[buy_day],
                    sell_price: prices[cursor],
                };
                result.total_profit += trade.profit();
                result.transactions.push(trade);

                if cursor + 1 >= last {
                    ScanState::Done
                } else {
                    ScanState::SeekingBuy(cursor + 1)
                }
            }
            ScanState::Done => break,
        };
    }

    result
}
