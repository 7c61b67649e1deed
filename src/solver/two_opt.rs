use std::time::{Duration, Instant};

use tracing::{debug, span, warn, Level};

use crate::distance::DistanceMatrix;
use crate::domain::types::{PriorityClass, RefineStats};
use crate::evaluation::fitness::{reversed_score, tour_score};
use crate::utils::two_opt_swap;

/// Caller-supplied limit on 2-opt work. `None` on both fields means run to convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefineBudget {
    /// Maximum number of full sweeps over all index pairs.
    pub max_sweeps: Option<usize>,
    /// Wall-clock limit measured from the start of refinement.
    pub time_limit: Option<Duration>,
}

impl RefineBudget {
    pub fn unbounded() -> Self {
        RefineBudget::default()
    }

    pub fn sweeps(max_sweeps: usize) -> Self {
        RefineBudget {
            max_sweeps: Some(max_sweeps),
            time_limit: None,
        }
    }

    pub fn time_limit(limit: Duration) -> Self {
        RefineBudget {
            max_sweeps: None,
            time_limit: Some(limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefineOutcome {
    pub order: Vec<usize>,
    pub stats: RefineStats,
}

/// First-improvement 2-opt over an open path anchored at the origin.
///
/// Every sweep visits all pairs `i < j`; a reversal of `i..=j` is kept when it
/// scores strictly lower than the current best, and scanning continues from the
/// updated order. Stops after a sweep with no improvement, or when the budget is
/// spent, returning the best order seen so far in both cases.
pub fn two_opt(
    initial: Vec<usize>,
    dm: &DistanceMatrix,
    priority: PriorityClass,
    budget: &RefineBudget,
) -> RefineOutcome {
    let refine_span = span!(Level::DEBUG, "two_opt", stops = initial.len());
    let _guard = refine_span.enter();

    let n = initial.len();
    let mut best = initial;
    let mut stats = RefineStats::default();

    if n < 2 {
        stats.converged = true;
        return RefineOutcome { order: best, stats };
    }

    let deadline = budget.time_limit.map(|limit| Instant::now() + limit);
    let mut best_score = tour_score(&best, dm, priority);
    let initial_score = best_score;

    'sweeps: loop {
        if budget.max_sweeps.is_some_and(|max| stats.sweeps >= max) {
            warn!("2-opt sweep cap of {} reached before convergence", stats.sweeps);
            break;
        }
        stats.sweeps += 1;
        let mut improved = false;

        for i in 0..n - 1 {
            for j in (i + 1)..n {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    warn!(
                        "2-opt time limit hit during sweep {} after {} swaps",
                        stats.sweeps, stats.swaps
                    );
                    break 'sweeps;
                }

                let candidate = reversed_score(&best, i, j, dm, priority);
                if candidate < best_score {
                    two_opt_swap(&mut best, i, j);
                    best_score = candidate;
                    stats.swaps += 1;
                    improved = true;
                }
            }
        }

        if !improved {
            stats.converged = true;
            break;
        }
    }

    debug!(
        "2-opt finished: {} sweeps, {} swaps, score {:.4} -> {:.4}, converged = {}",
        stats.sweeps, stats.swaps, initial_score, best_score, stats.converged
    );
    RefineOutcome { order: best, stats }
}
