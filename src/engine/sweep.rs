use crate::data::PricePoint;
use crate::engine::backtest::{run_backtest, BacktestConfig};
use crate::error::Result;
use crate::metrics::SummaryMetrics;
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{info, warn};

//outcome of one window pair in a parameter sweep
#[derive(Debug, Clone)]
pub struct SweepEntry {
    pub config: BacktestConfig,
    pub summary: SummaryMetrics,
}

//runs every valid (short, long) pair over the same series in parallel
//pairs with short >= long are skipped, results keep grid order
pub fn run_sweep(
    series: &[PricePoint],
    base: &BacktestConfig,
    shorts: &[usize],
    longs: &[usize],
) -> IndexMap<(usize, usize), Result<SweepEntry>> {
    let mut grid = Vec::with_capacity(shorts.len() * longs.len());
    for &short in shorts {
        for &long in longs {
            if short >= long {
                warn!(short, long, "skipping window pair, short must be below long");
                continue;
            }
            grid.push((short, long));
        }
    }

    info!(pairs = grid.len(), "running parameter sweep");

    let outcomes: Vec<_> = grid
        .par_iter()
        .map(|&(short, long)| {
            let config = BacktestConfig {
                short_window: short,
                long_window: long,
                ..*base
            };
            let outcome = run_backtest(series, &config).map(|result| SweepEntry {
                config,
                summary: result.summary(),
            });
            ((short, long), outcome)
        })
        .collect();

    outcomes.into_iter().collect()
}

//successful entries ordered best total return first
pub fn rank_by_return(
    results: &IndexMap<(usize, usize), Result<SweepEntry>>,
) -> Vec<&SweepEntry> {
    let mut ranked: Vec<&SweepEntry> = results
        .values()
        .filter_map(|outcome| outcome.as_ref().ok())
        .collect();
    ranked.sort_by(|a, b| {
        b.summary
            .total_return_pct
            .total_cmp(&a.summary.total_return_pct)
    });
    ranked
}
