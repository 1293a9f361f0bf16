use std::sync::Arc;

use crate::support::units::SiQuantity;

use super::{
    block::{Block, BlockError, BlockFn, Inputs, Port},
    parameter::Parameter,
    quantity::Value,
    registry::BuildError,
};

/// Perturbs selected block outputs to model the uncertainty of a sizing law.
///
/// For each selected output `q`, two parameters are added:
/// - `uncertainty:<q>:rel`, dimensionless
/// - `uncertainty:<q>:abs`, in the dimension of `q`
///
/// Both default to zero, and the block reports `mean·(1 + rel) + abs`
/// instead of its nominal `mean`. Outputs that are not selected are left
/// untouched.
///
/// ```
/// use uom::si::f64::Mass;
/// use twine_mda::mda::{Block, Deviation, Registry, Value};
///
/// let motor = Block::builder("motor:weight")
///     .output::<Mass>("motor:mass")
///     .compute(|_| Ok(vec![Value::si::<Mass>(0.4)]));
///
/// let mut registry = Registry::new();
/// registry
///     .register_with_deviation(motor, &Deviation::on("motor:mass"))
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deviation {
    outputs: Vec<String>,
}

impl Deviation {
    /// Selects one output.
    pub fn on(output: impl Into<String>) -> Self {
        Self {
            outputs: vec![output.into()],
        }
    }

    /// Selects another output.
    #[must_use]
    pub fn and(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    /// Name of the relative-deviation parameter for `output`.
    #[must_use]
    pub fn relative_name(output: &str) -> String {
        format!("uncertainty:{output}:rel")
    }

    /// Name of the absolute-deviation parameter for `output`.
    #[must_use]
    pub fn absolute_name(output: &str) -> String {
        format!("uncertainty:{output}:abs")
    }

    /// Wraps `block` so the selected outputs are perturbed.
    ///
    /// Returns the wrapped block and the parameters it now reads.
    pub(crate) fn apply(&self, block: Block) -> Result<(Block, Vec<Parameter>), BuildError> {
        let mut targets = Vec::with_capacity(self.outputs.len());
        for name in &self.outputs {
            let Some(position) = block.outputs().iter().position(|p| p.name() == name) else {
                return Err(BuildError::UnknownDeviationOutput {
                    block: block.id().to_owned(),
                    quantity: name.clone(),
                });
            };
            targets.push(position);
        }

        let nominal_inputs = block.inputs().len();
        let mut inputs = block.inputs().to_vec();
        let mut parameters = Vec::with_capacity(2 * targets.len());
        for &position in &targets {
            let output = &block.outputs()[position];
            let rel = Port::new(Self::relative_name(output.name()), f64::dimension());
            let abs = Port::new(Self::absolute_name(output.name()), output.dimension());
            parameters.push(Parameter::constant(rel.name(), 0.0));
            parameters.push(Parameter::zero(abs.name(), abs.dimension()));
            inputs.push(rel);
            inputs.push(abs);
        }

        let nominal = block.function();
        let function: Arc<BlockFn> = Arc::new(move |all: &Inputs<'_>| -> Result<Vec<Value>, BlockError> {
            let mut outputs = nominal(&all.leading(nominal_inputs)?)?;
            for (k, &position) in targets.iter().enumerate() {
                let rel = all.scalar(nominal_inputs + 2 * k)?;
                let abs = all.scalar(nominal_inputs + 2 * k + 1)?;
                if let Some(value) = outputs.get_mut(position) {
                    *value = value.map_components(|mean| mean * (1.0 + rel) + abs);
                }
            }
            Ok(outputs)
        });

        let wrapped = Block::with_parts(
            block.id().to_owned(),
            inputs,
            block.outputs().to_vec(),
            function,
        );
        Ok((wrapped, parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::f64::Mass;

    fn motor() -> Block {
        Block::builder("motor:weight")
            .input::<f64>("motor:torque_ratio")
            .output::<Mass>("motor:mass")
            .output::<f64>("motor:count")
            .compute(|inputs| {
                let ratio = inputs.scalar(0)?;
                Ok(vec![Value::si::<Mass>(0.5 * ratio), Value::dimensionless(4.0)])
            })
    }

    #[test]
    fn adds_parameters_and_perturbs_selected_output() {
        let (block, parameters) = Deviation::on("motor:mass").apply(motor()).unwrap();

        let names: Vec<_> = parameters.iter().map(Parameter::name).collect();
        assert_eq!(
            names,
            ["uncertainty:motor:mass:rel", "uncertainty:motor:mass:abs"]
        );
        assert_eq!(parameters[1].dimension(), Mass::dimension());
        assert_eq!(block.inputs().len(), 3);

        let ratio = Value::dimensionless(2.0);
        let rel = Value::dimensionless(0.1);
        let abs = Value::si::<Mass>(0.05);
        let values = [&ratio, &rel, &abs];
        let inputs = Inputs::new(block.inputs(), &values);

        let outputs = block.evaluate(&inputs).unwrap();
        assert_relative_eq!(outputs[0].as_scalar().unwrap(), 1.0 * 1.1 + 0.05);
        assert_eq!(outputs[1].as_scalar(), Some(4.0));
    }

    #[test]
    fn unknown_output_is_rejected() {
        let err = Deviation::on("motor:volume").apply(motor()).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownDeviationOutput {
                block: "motor:weight".into(),
                quantity: "motor:volume".into(),
            }
        );
    }
}
