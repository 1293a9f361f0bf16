use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::support::{
    bound::Interval,
    units::{Dimension, SiQuantity},
};

use super::quantity::{Value, ValueError};

/// Signature of a block's computation.
pub type BlockFn = dyn Fn(&Inputs<'_>) -> Result<Vec<Value>, BlockError> + Send + Sync;

/// A named, dimensioned connection point of a block or constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    name: String,
    dimension: Dimension,
    domain: Option<Interval>,
}

impl Port {
    pub(crate) fn new(name: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
            domain: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// The physical domain declared for an output, if any.
    #[must_use]
    pub fn domain(&self) -> Option<Interval> {
        self.domain
    }
}

/// A unit of computation with declared inputs and outputs.
///
/// A block never touches the quantity store. The engine gathers its inputs,
/// calls the function, and writes back exactly the declared outputs, in
/// declaration order.
///
/// ```
/// use uom::si::f64::{ElectricCurrent, ElectricPotential, Power};
/// use twine_mda::mda::{Block, Value};
///
/// let current = Block::builder("battery:current")
///     .input::<Power>("power")
///     .input::<ElectricPotential>("voltage")
///     .output::<ElectricCurrent>("current")
///     .compute(|inputs| {
///         let p = inputs.scalar(0)?;
///         let v = inputs.scalar(1)?;
///         Ok(vec![Value::si::<ElectricCurrent>(p / v)])
///     });
///
/// assert_eq!(current.outputs().len(), 1);
/// ```
#[derive(Clone)]
pub struct Block {
    id: String,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    function: Arc<BlockFn>,
}

impl Block {
    pub fn builder(id: impl Into<String>) -> BlockBuilder {
        BlockBuilder {
            id: id.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    /// Calls the block's function.
    ///
    /// # Errors
    ///
    /// Returns whatever error the block's function returns.
    pub fn evaluate(&self, inputs: &Inputs<'_>) -> Result<Vec<Value>, BlockError> {
        (self.function)(inputs)
    }

    pub(crate) fn with_parts(
        id: String,
        inputs: Vec<Port>,
        outputs: Vec<Port>,
        function: Arc<BlockFn>,
    ) -> Self {
        Self {
            id,
            inputs,
            outputs,
            function,
        }
    }

    pub(crate) fn function(&self) -> Arc<BlockFn> {
        Arc::clone(&self.function)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

/// Declares a [`Block`] port by port.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    id: String,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
}

impl BlockBuilder {
    /// Declares the next input, read as quantity type `Q`.
    #[must_use]
    pub fn input<Q: SiQuantity>(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(Port::new(name, Q::dimension()));
        self
    }

    /// Declares the next output, of quantity type `Q`.
    #[must_use]
    pub fn output<Q: SiQuantity>(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(Port::new(name, Q::dimension()));
        self
    }

    /// Declares the next output along with its physical domain, in SI units.
    ///
    /// Values outside `domain` are reported as a domain error instead of
    /// being propagated.
    #[must_use]
    pub fn output_within<Q: SiQuantity>(mut self, name: impl Into<String>, domain: Interval) -> Self {
        let mut port = Port::new(name, Q::dimension());
        port.domain = Some(domain);
        self.outputs.push(port);
        self
    }

    /// Finishes the block with its computation.
    ///
    /// The function must return one value per declared output, in order.
    pub fn compute<F>(self, function: F) -> Block
    where
        F: Fn(&Inputs<'_>) -> Result<Vec<Value>, BlockError> + Send + Sync + 'static,
    {
        Block {
            id: self.id,
            inputs: self.inputs,
            outputs: self.outputs,
            function: Arc::new(function),
        }
    }
}

/// The input values handed to a block or constraint, in declaration order.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    ports: &'a [Port],
    values: &'a [&'a Value],
}

impl<'a> Inputs<'a> {
    pub(crate) fn new(ports: &'a [Port], values: &'a [&'a Value]) -> Self {
        debug_assert_eq!(ports.len(), values.len());
        Self { ports, values }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns input `index` as a raw value.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range.
    pub fn value(&self, index: usize) -> Result<&'a Value, BlockError> {
        self.values
            .get(index)
            .copied()
            .ok_or(BlockError::MissingInput { index })
    }

    /// Returns input `index` as an SI scalar.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range or the input is a vector.
    pub fn scalar(&self, index: usize) -> Result<f64, BlockError> {
        self.value(index)?
            .as_scalar()
            .ok_or_else(|| self.misuse(index, ValueError::NotScalar))
    }

    /// Returns input `index` as a typed quantity.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range, the input is a vector, or `Q` has
    /// a different dimension.
    pub fn quantity<Q: SiQuantity>(&self, index: usize) -> Result<Q, BlockError> {
        self.value(index)?
            .get::<Q>()
            .map_err(|source| self.misuse(index, source))
    }

    /// Returns the components of input `index`.
    ///
    /// # Errors
    ///
    /// Fails if `index` is out of range.
    pub fn components(&self, index: usize) -> Result<&'a [f64], BlockError> {
        Ok(self.value(index)?.components())
    }

    /// The first `count` inputs.
    pub(crate) fn leading(&self, count: usize) -> Result<Self, BlockError> {
        match (self.ports.get(..count), self.values.get(..count)) {
            (Some(ports), Some(values)) => Ok(Self { ports, values }),
            _ => Err(BlockError::MissingInput { index: count }),
        }
    }

    fn misuse(&self, index: usize, source: ValueError) -> BlockError {
        BlockError::Input {
            name: self
                .ports
                .get(index)
                .map_or_else(String::new, |port| port.name().to_owned()),
            source,
        }
    }
}

/// An error returned by a block or constraint function.
///
/// [`BlockError::Rejected`] means the inputs are physically unacceptable and
/// is reported as a domain error of the run. The other variants mean the
/// function read its inputs incorrectly and abort the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlockError {
    #[error("input {index} is out of range")]
    MissingInput { index: usize },
    #[error("input `{name}`: {source}")]
    Input {
        name: String,
        #[source]
        source: ValueError,
    },
    #[error("{reason}")]
    Rejected { reason: String },
}

impl BlockError {
    /// Rejects the current inputs as physically invalid.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{
        f64::{Length, Mass},
        length::meter,
    };

    #[test]
    fn builder_records_ports_in_order() {
        let block = Block::builder("propeller:geometry")
            .input::<Length>("diameter")
            .input::<f64>("blade_count")
            .output_within::<Mass>("mass", Interval::at_least(0.0).unwrap())
            .compute(|_| Ok(vec![Value::si::<Mass>(0.1)]));

        let names: Vec<_> = block.inputs().iter().map(Port::name).collect();
        assert_eq!(names, ["diameter", "blade_count"]);
        assert_eq!(block.outputs()[0].dimension(), Dimension::MASS);
        assert!(block.outputs()[0].domain().is_some());
        assert!(block.inputs()[0].domain().is_none());
    }

    #[test]
    fn accessors_report_misuse() {
        let ports = [
            Port::new("diameter", Length::dimension()),
            Port::new("loads", Dimension::DIMENSIONLESS),
        ];
        let d = Value::new(Length::new::<meter>(0.3));
        let loads = Value::vector([1.0, 2.0]);
        let values = [&d, &loads];
        let inputs = Inputs::new(&ports, &values);

        assert_eq!(inputs.scalar(0), Ok(0.3));
        assert!(inputs.quantity::<Length>(0).is_ok());
        assert_eq!(inputs.components(1), Ok(&[1.0, 2.0][..]));
        assert_eq!(inputs.value(2), Err(BlockError::MissingInput { index: 2 }));

        let err = inputs.quantity::<Mass>(0).unwrap_err();
        assert!(matches!(err, BlockError::Input { ref name, .. } if name == "diameter"));
        assert!(matches!(inputs.scalar(1), Err(BlockError::Input { .. })));

        let first = inputs.leading(1).unwrap();
        assert_eq!(first.len(), 1);
        assert!(inputs.leading(3).is_err());
    }
}
