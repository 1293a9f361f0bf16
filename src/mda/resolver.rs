use std::time::Instant;

use super::{
    evaluation::{ConvergenceError, ConvergenceLimit, CycleReport},
    graph::Cycle,
    node::{Node, StageFailure},
    options::RunOptions,
    store::{QuantityId, QuantityStore},
};

/// Iterates one cycle to a fixed point with under-relaxed Gauss-Seidel passes.
///
/// Each pass runs the cycle's blocks in their planned order, so later blocks
/// see values written earlier in the same pass. Every cycle quantity is
/// written as `α·new + (1 − α)·old`, where `old` is its value at the start of
/// the pass. The pass's change is the largest relative change over the
/// cycle's quantities; a quantity with no previous value counts as an
/// infinite change, so at least two passes always run unless every
/// quantity was seeded.
///
/// On a domain error the cycle quantities are put back to their values at
/// the start of the failing pass.
pub(crate) fn resolve(
    cycle: &Cycle,
    nodes: &[Node],
    store: &mut QuantityStore<'_>,
    options: &RunOptions,
    deadline: Option<Instant>,
) -> Result<CycleReport, StageFailure> {
    let alpha = options.relaxation.get();
    let tolerance = options.tolerance.get();
    let floor = options.delta_floor.get();
    let max_passes = options.max_iterations.get();

    let block_ids: Vec<String> = cycle
        .blocks
        .iter()
        .map(|&b| nodes[b].id().to_owned())
        .collect();

    let mut history = Vec::new();
    let mut last_delta = f64::INFINITY;
    let mut worst = cycle.quantities.first().copied();

    for pass in 1..=max_passes {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(stalled(
                store,
                block_ids,
                worst,
                last_delta,
                history,
                ConvergenceLimit::TimeBudget,
            ));
        }

        let before = store.snapshot(&cycle.quantities);
        for &b in &cycle.blocks {
            let node = &nodes[b];
            let outputs = match node.evaluate(store) {
                Ok(outputs) => outputs,
                Err(failure) => {
                    store.restore(&before);
                    return Err(failure);
                }
            };
            for (&id, value) in node.outputs.iter().zip(outputs) {
                let value = match before.get(id) {
                    Some(previous) => value.relaxed_towards(previous, alpha),
                    None => value,
                };
                store.write(id, value)?;
            }
        }

        let mut delta = 0.0;
        for &id in &cycle.quantities {
            let change = match (store.value(id), before.get(id)) {
                (Ok(new), Some(old)) => new.relative_change(old, floor),
                _ => f64::INFINITY,
            };
            if change > delta || worst.is_none() {
                delta = change;
                worst = Some(id);
            }
        }
        history.push(delta);
        last_delta = delta;

        tracing::trace!(
            pass,
            delta,
            quantity = worst.map_or("", |id| store.name(id)),
            "cycle pass"
        );

        if delta < tolerance {
            tracing::debug!(blocks = ?block_ids, passes = pass, delta, "cycle converged");
            return Ok(CycleReport {
                blocks: block_ids,
                passes: pass,
                last_delta: delta,
            });
        }
    }

    Err(stalled(
        store,
        block_ids,
        worst,
        last_delta,
        history,
        ConvergenceLimit::Iterations,
    ))
}

fn stalled(
    store: &QuantityStore<'_>,
    blocks: Vec<String>,
    worst: Option<QuantityId>,
    last_delta: f64,
    history: Vec<f64>,
    limit: ConvergenceLimit,
) -> StageFailure {
    let quantity = worst.map_or_else(String::new, |id| store.name(id).to_owned());
    tracing::warn!(
        blocks = ?blocks,
        quantity = %quantity,
        last_delta,
        passes = history.len(),
        %limit,
        "cycle did not converge"
    );
    StageFailure::Convergence(ConvergenceError {
        blocks,
        quantity,
        last_delta,
        passes: history.len(),
        history,
        limit,
    })
}
