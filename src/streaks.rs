/// Sign of the day-over-day price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    fn between(prev: f64, curr: f64) -> Self {
        let delta = curr - prev;
        if delta > 0.0 {
            Direction::Up
        } else if delta < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn is_streak(self) -> bool {
        self != Direction::Flat
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Flat => "FLAT",
        };
        f.pad(label)
    }
}

/// Streak labels attached to one day of a series.
///
/// Flat days belong to no run and carry `run_id == 0` and `run_length == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakRow {
    pub direction: Direction,
    pub run_id: u32,
    pub run_length: u32,
}

/// A maximal run of consecutive Up (or Down) days, by row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan {
    pub run_id: u32,
    pub start: usize,
    pub end: usize,
    pub length: u32,
}

/// Run counts plus the longest run in each direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub up_runs: usize,
    pub down_runs: usize,
    pub longest_up: Option<RunSpan>,
    pub longest_down: Option<RunSpan>,
}

/// Labels every day with its movement direction and run position.
///
/// The first day, equal consecutive prices and NaN comparisons are `Flat`.
/// A new run starts on each Up/Down day whose direction differs from the
/// previous day's, so a Flat day always breaks a streak.
pub fn movement_direction(prices: &[f64]) -> Vec<StreakRow> {
    let mut rows = Vec::with_capacity(prices.len());
    let mut previous = None::<Direction>;
    let mut run_id = 0u32;
    let mut run_length = 0u32;

    for (i, &price) in prices.iter().enumerate() {
        let direction = match i {
            0 => Direction::Flat,
            _ => Direction::between(prices[i - 1], price),
        };

        let row = if direction.is_streak() {
            if previous != Some(direction) {
                run_id += 1;
                run_length = 0;
            }
            run_length += 1;
            StreakRow { direction, run_id, run_length }
        } else {
            StreakRow { direction, run_id: 0, run_length: 0 }
        };

        rows.push(row);
        previous = Some(direction);
    }

    rows
}

/// Summarizes labeled rows into run counts and the longest run per direction.
///
/// Ties between equally long runs resolve to the earliest one.
pub fn run_summary(rows: &[StreakRow]) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut current: Option<(Direction, RunSpan)> = None;

    for (i, row) in rows.iter().enumerate() {
        if !row.direction.is_streak() {
            continue;
        }
        if let Some((_, span)) = current.as_mut().filter(|(_, s)| s.run_id == row.run_id) {
            span.end = i;
            span.length = row.run_length;
            continue;
        }
        if let Some((direction, span)) = current.take() {
            summary.record(direction, span);
        }
        current = Some((
            row.direction,
            RunSpan { run_id: row.run_id, start: i, end: i, length: row.run_length },
        ));
    }
    if let Some((direction, span)) = current {
        summary.record(direction, span);
    }

    summary
}

impl RunSummary {
    fn record(&mut self, direction: Direction, span: RunSpan) {
        let (count, longest) = match direction {
            Direction::Up => (&mut self.up_runs, &mut self.longest_up),
            Direction::Down => (&mut self.down_runs, &mut self.longest_down),
            Direction::Flat => return,
        };
        *count += 1;
        if longest.map_or(true, |best| span.length > best.length) {
            *longest = Some(span);
        }
    }
}
