use super::{
    block::{Block, BlockError, Inputs, Port},
    error::RunError,
    evaluation::{ConvergenceError, DomainError, DomainViolation},
    quantity::Value,
    store::{QuantityId, QuantityStore, StoreError},
};

/// A registered block with its ports resolved to store slots.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) block: Block,
    pub(crate) inputs: Vec<QuantityId>,
    pub(crate) outputs: Vec<QuantityId>,
}

/// Why a stage stopped.
#[derive(Debug)]
pub(crate) enum StageFailure {
    /// A model bug or bad design point; aborts the run.
    Run(RunError),
    Domain(DomainError),
    Convergence(ConvergenceError),
}

impl From<RunError> for StageFailure {
    fn from(error: RunError) -> Self {
        Self::Run(error)
    }
}

impl From<StoreError> for StageFailure {
    fn from(error: StoreError) -> Self {
        Self::Run(error.into())
    }
}

impl Node {
    pub(crate) fn id(&self) -> &str {
        self.block.id()
    }

    /// Runs the block against the current store and validates what it returns.
    ///
    /// Nothing is written; the caller decides how outputs reach the store.
    pub(crate) fn evaluate(&self, store: &QuantityStore<'_>) -> Result<Vec<Value>, StageFailure> {
        let values = self
            .inputs
            .iter()
            .map(|&id| store.value(id))
            .collect::<Result<Vec<_>, _>>()?;
        let inputs = Inputs::new(self.block.inputs(), &values);

        let outputs = match self.block.evaluate(&inputs) {
            Ok(outputs) => outputs,
            Err(BlockError::Rejected { reason }) => {
                let quantity = self.block.outputs().first().map_or("", Port::name);
                return Err(self.domain_error(quantity, DomainViolation::Rejected { reason }));
            }
            Err(source) => {
                return Err(RunError::Block {
                    block: self.id().to_owned(),
                    source,
                }
                .into());
            }
        };

        if outputs.len() != self.outputs.len() {
            return Err(RunError::OutputArity {
                block: self.id().to_owned(),
                expected: self.outputs.len(),
                found: outputs.len(),
            }
            .into());
        }

        for (port, value) in self.block.outputs().iter().zip(&outputs) {
            if let Some(value) = value.first_non_finite() {
                return Err(self.domain_error(port.name(), DomainViolation::NonFinite { value }));
            }
            if let Some(domain) = port.domain() {
                if let Some(&value) = value.components().iter().find(|&&x| !domain.contains(x)) {
                    return Err(
                        self.domain_error(port.name(), DomainViolation::OutOfRange { value, domain })
                    );
                }
            }
        }

        Ok(outputs)
    }

    fn domain_error(&self, quantity: &str, violation: DomainViolation) -> StageFailure {
        tracing::warn!(block = self.id(), quantity, %violation, "domain error");
        StageFailure::Domain(DomainError {
            block: self.id().to_owned(),
            quantity: quantity.to_owned(),
            violation,
        })
    }
}
