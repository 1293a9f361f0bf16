//! Execution planning over the bipartite block/quantity graph.
//!
//! Edges run from each input quantity to the block that reads it and from
//! each block to the quantities it writes. Bootstraps take part like blocks
//! with a single output. Strongly connected components of this graph are
//! the coupled cycles; everything else is a singleton that runs once.

mod tarjan;

use std::collections::HashSet;

use super::{
    node::Node,
    registry::BuildError,
    store::{Catalog, QuantityId},
};

/// One step of the execution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Stage {
    Block(usize),
    Bootstrap(usize),
    Cycle(Cycle),
}

/// A coupled group of blocks resolved by fixed-point iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cycle {
    /// Block indices in pass order.
    pub(crate) blocks: Vec<usize>,
    /// Quantities inside the component, sorted.
    pub(crate) quantities: Vec<QuantityId>,
    /// Quantities a bootstrap writes before the first pass.
    pub(crate) seeded: Vec<QuantityId>,
}

/// A readable description of one planned stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageSummary {
    Block(String),
    Bootstrap(String),
    Cycle {
        /// Block ids in pass order.
        blocks: Vec<String>,
        /// Quantities whose change is monitored for convergence.
        quantities: Vec<String>,
        /// Quantities seeded by bootstraps.
        seeded: Vec<String>,
    },
}

impl Stage {
    pub(crate) fn summarize(&self, blocks: &[Node], bootstraps: &[Node], catalog: &Catalog) -> StageSummary {
        let names = |ids: &[QuantityId]| -> Vec<String> {
            ids.iter().map(|&id| catalog.name(id).to_owned()).collect()
        };
        match self {
            Self::Block(i) => StageSummary::Block(blocks[*i].id().to_owned()),
            Self::Bootstrap(i) => StageSummary::Bootstrap(bootstraps[*i].id().to_owned()),
            Self::Cycle(cycle) => StageSummary::Cycle {
                blocks: cycle.blocks.iter().map(|&b| blocks[b].id().to_owned()).collect(),
                quantities: names(&cycle.quantities),
                seeded: names(&cycle.seeded),
            },
        }
    }
}

/// Orders blocks, bootstraps and cycles so every stage runs after its inputs exist.
pub(crate) fn plan(
    blocks: &[Node],
    bootstraps: &[Node],
    catalog: &Catalog,
) -> Result<Vec<Stage>, BuildError> {
    let first_bootstrap = blocks.len();
    let first_quantity = first_bootstrap + bootstraps.len();
    let quantity_node = |id: QuantityId| first_quantity + id.0;

    let mut adjacency = vec![Vec::new(); first_quantity + catalog.len()];
    for (node, entry) in blocks.iter().chain(bootstraps).enumerate() {
        for &input in &entry.inputs {
            adjacency[quantity_node(input)].push(node);
        }
        for &output in &entry.outputs {
            adjacency[node].push(quantity_node(output));
        }
    }

    let mut components = tarjan::strongly_connected_components(&adjacency);
    components.reverse();

    let mut stages = Vec::new();
    let mut cyclic_quantities = HashSet::new();
    for component in &components {
        if let [node] = component.as_slice() {
            if *node < first_bootstrap {
                stages.push(Stage::Block(*node));
            } else if *node < first_quantity {
                stages.push(Stage::Bootstrap(*node - first_bootstrap));
            }
            continue;
        }

        let quantities: Vec<QuantityId> = component
            .iter()
            .filter(|&&n| n >= first_quantity)
            .map(|&n| QuantityId(n - first_quantity))
            .collect();

        if let Some(&node) = component
            .iter()
            .find(|&&n| (first_bootstrap..first_quantity).contains(&n))
        {
            let bootstrap = &bootstraps[node - first_bootstrap];
            return Err(BuildError::BootstrapInCycle {
                bootstrap: bootstrap.id().to_owned(),
                quantity: bootstrap
                    .outputs
                    .first()
                    .map_or_else(String::new, |&q| catalog.name(q).to_owned()),
            });
        }

        let members: Vec<usize> = component
            .iter()
            .copied()
            .filter(|&n| n < first_bootstrap)
            .collect();
        cyclic_quantities.extend(quantities.iter().copied());
        stages.push(Stage::Cycle(order_cycle(
            blocks, bootstraps, members, quantities, catalog,
        )?));
    }

    for bootstrap in bootstraps {
        if let Some(&target) = bootstrap.outputs.first() {
            if !cyclic_quantities.contains(&target) {
                return Err(BuildError::BootstrapOutsideCycle {
                    bootstrap: bootstrap.id().to_owned(),
                    quantity: catalog.name(target).to_owned(),
                });
            }
        }
    }

    Ok(stages)
}

/// Picks a Gauss-Seidel pass order for the blocks of one cycle.
///
/// Starting from the bootstrapped quantities, repeatedly takes the first
/// block (in registration order) whose cycle inputs are all available.
fn order_cycle(
    blocks: &[Node],
    bootstraps: &[Node],
    members: Vec<usize>,
    quantities: Vec<QuantityId>,
    catalog: &Catalog,
) -> Result<Cycle, BuildError> {
    let in_cycle = |q: &QuantityId| quantities.binary_search(q).is_ok();

    let mut seeded: Vec<QuantityId> = bootstraps
        .iter()
        .filter_map(|b| b.outputs.first().copied())
        .filter(in_cycle)
        .collect();
    seeded.sort_unstable();

    let mut available: HashSet<QuantityId> = seeded.iter().copied().collect();
    let mut remaining = members;
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|&b| {
            blocks[b]
                .inputs
                .iter()
                .all(|q| !in_cycle(q) || available.contains(q))
        });
        let Some(position) = ready else {
            let stuck = &blocks[remaining[0]];
            let missing = stuck
                .inputs
                .iter()
                .find(|&&q| in_cycle(&q) && !available.contains(&q))
                .map_or_else(String::new, |&q| catalog.name(q).to_owned());
            let mut ids: Vec<String> = order
                .iter()
                .chain(&remaining)
                .map(|&b: &usize| blocks[b].id().to_owned())
                .collect();
            ids.sort();
            return Err(BuildError::MissingBootstrap {
                blocks: ids,
                quantity: missing,
            });
        };
        let block = remaining.remove(position);
        available.extend(blocks[block].outputs.iter().copied());
        order.push(block);
    }

    Ok(Cycle {
        blocks: order,
        quantities,
        seeded,
    })
}
