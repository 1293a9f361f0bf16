mod error;

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::support::units::Dimension;

use super::{
    block::{Block, Port},
    constraint::{BoundConstraint, Constraint},
    deviation::Deviation,
    engine::Engine,
    graph,
    node::Node,
    parameter::Parameter,
    quantity::Producer,
    store::{Catalog, QuantityId},
};

pub use error::BuildError;

/// Collects blocks, bootstraps, parameters and constraints, then validates
/// and compiles them into an [`Engine`].
///
/// Registration is order-free: a block may read a quantity whose producer is
/// registered later. Checks that only need the new entry (duplicate ids,
/// duplicate producers, dimension clashes) fail immediately and leave the
/// registry unchanged; checks that need the whole network happen in
/// [`Registry::build`].
#[derive(Debug, Default)]
pub struct Registry {
    blocks: Vec<Block>,
    bootstraps: Vec<Block>,
    parameters: Vec<Parameter>,
    constraints: Vec<Constraint>,
    /// Every quantity name with its dimension, in first-declaration order.
    declarations: IndexMap<String, Dimension>,
    producers: HashMap<String, Producer>,
    /// First block reading each quantity.
    consumers: HashMap<String, String>,
    bootstrapped: IndexMap<String, String>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block.
    ///
    /// # Errors
    ///
    /// Fails if the id is taken, an output already has a producer, a port
    /// disagrees with an earlier declaration's dimension, or an input is a
    /// registered constraint.
    pub fn register(&mut self, block: Block) -> Result<&mut Self, BuildError> {
        self.check_block(&block)?;
        self.commit_block(block);
        Ok(self)
    }

    /// Adds a block with an uncertainty deviation applied to some of its outputs.
    ///
    /// The deviation's parameters are registered as constants defaulting to
    /// zero unless a parameter of the same name already exists. Nothing is
    /// added unless the block and every new parameter pass their checks.
    ///
    /// # Errors
    ///
    /// Fails if the deviation names an output the block does not have, if a
    /// deviation parameter clashes with an existing declaration, or for any
    /// reason [`Registry::register`] would.
    pub fn register_with_deviation(
        &mut self,
        block: Block,
        deviation: &Deviation,
    ) -> Result<&mut Self, BuildError> {
        let (block, parameters) = deviation.apply(block)?;
        self.check_block(&block)?;

        let parameters: Vec<Parameter> = parameters
            .into_iter()
            .filter(|p| !self.producers.contains_key(p.name()))
            .collect();
        for parameter in &parameters {
            self.check_parameter(parameter)?;
            if block.outputs().iter().any(|port| port.name() == parameter.name()) {
                return Err(BuildError::DuplicateOutput {
                    quantity: parameter.name().to_owned(),
                    first: parameter.producer(),
                    second: Producer::Block(block.id().to_owned()),
                });
            }
        }

        for parameter in parameters {
            self.commit_parameter(parameter);
        }
        self.commit_block(block);
        Ok(self)
    }

    /// Adds a bootstrap: a one-output block that supplies the first estimate
    /// of a cycle quantity.
    ///
    /// A cycle may need more than one. The first pass runs the cycle's blocks
    /// one at a time, each only once all of its cycle inputs have a value, so
    /// the bootstrapped quantities must be enough to reach every block.
    ///
    /// # Errors
    ///
    /// Fails if the block does not declare exactly one output, its id is
    /// taken, the target already has a bootstrap, or a port clashes in
    /// dimension with an earlier declaration.
    pub fn bootstrap(&mut self, block: Block) -> Result<&mut Self, BuildError> {
        let [target] = block.outputs() else {
            return Err(BuildError::InvalidBootstrap {
                id: block.id().to_owned(),
                outputs: block.outputs().len(),
            });
        };
        self.check_id(block.id())?;
        if let Some(first) = self.bootstrapped.get(target.name()) {
            return Err(BuildError::DuplicateBootstrap {
                quantity: target.name().to_owned(),
                first: first.clone(),
                second: block.id().to_owned(),
            });
        }
        self.check_ports(
            &format!("bootstrap `{}`", block.id()),
            block.inputs().iter().chain(block.outputs()),
        )?;

        self.declare(block.inputs().iter().chain(block.outputs()));
        self.bootstrapped
            .insert(target.name().to_owned(), block.id().to_owned());
        self.bootstraps.push(block);
        Ok(self)
    }

    /// Adds a design variable or constant.
    ///
    /// # Errors
    ///
    /// Fails if the quantity already has a producer or was declared with a
    /// different dimension.
    pub fn parameter(&mut self, parameter: Parameter) -> Result<&mut Self, BuildError> {
        self.check_parameter(&parameter)?;
        self.commit_parameter(parameter);
        Ok(self)
    }

    /// Adds a constraint.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken by another constraint, a block already
    /// reads a quantity of that name, or an input clashes in dimension with
    /// an earlier declaration.
    pub fn constraint(&mut self, constraint: Constraint) -> Result<&mut Self, BuildError> {
        if self.constraints.iter().any(|c| c.name() == constraint.name()) {
            return Err(BuildError::DuplicateConstraint {
                name: constraint.name().to_owned(),
            });
        }
        if let Some(block) = self.consumers.get(constraint.name()) {
            return Err(BuildError::ConstraintAsInput {
                constraint: constraint.name().to_owned(),
                block: block.clone(),
            });
        }
        self.check_ports(
            &format!("constraint `{}`", constraint.name()),
            constraint.inputs().iter(),
        )?;

        self.declare(constraint.inputs().iter());
        self.constraints.push(constraint);
        Ok(self)
    }

    /// Validates the whole network and compiles it.
    ///
    /// # Errors
    ///
    /// Fails if any input has no producer, or if planning finds a cycle whose
    /// bootstraps cannot start its first pass, a bootstrap inside the cycle
    /// it seeds, or a bootstrap targeting an acyclic quantity.
    pub fn build(self) -> Result<Engine, BuildError> {
        self.check_resolved()?;

        let mut catalog = Catalog::default();
        for (name, dimension) in &self.declarations {
            catalog.insert(name, *dimension);
        }
        let bind = |block: Block| {
            let ids = |ports: &[Port]| -> Vec<QuantityId> {
                ports
                    .iter()
                    .filter_map(|port| catalog.id(port.name()))
                    .collect()
            };
            Node {
                inputs: ids(block.inputs()),
                outputs: ids(block.outputs()),
                block,
            }
        };
        let blocks: Vec<Node> = self.blocks.into_iter().map(bind).collect();
        let bootstraps: Vec<Node> = self.bootstraps.into_iter().map(bind).collect();

        let stages = graph::plan(&blocks, &bootstraps, &catalog)?;

        let parameters: Vec<(Parameter, QuantityId)> = self
            .parameters
            .into_iter()
            .filter_map(|p| catalog.id(p.name()).map(|id| (p, id)))
            .collect();
        let parameter_index = parameters
            .iter()
            .enumerate()
            .map(|(i, (p, _))| (p.name().to_owned(), i))
            .collect();
        let constraints = self
            .constraints
            .into_iter()
            .map(|constraint| BoundConstraint {
                inputs: constraint
                    .inputs()
                    .iter()
                    .filter_map(|port| catalog.id(port.name()))
                    .collect(),
                constraint,
            })
            .collect();

        let engine = Engine {
            catalog,
            blocks,
            bootstraps,
            parameters,
            parameter_index,
            constraints,
            stages,
        };
        tracing::info!(
            blocks = engine.blocks.len(),
            quantities = engine.catalog.len(),
            stages = engine.stages.len(),
            cycles = engine
                .stages
                .iter()
                .filter(|s| matches!(s, graph::Stage::Cycle(_)))
                .count(),
            "built analysis engine"
        );
        Ok(engine)
    }

    fn check_block(&self, block: &Block) -> Result<(), BuildError> {
        self.check_id(block.id())?;
        let producer = Producer::Block(block.id().to_owned());
        for (i, port) in block.outputs().iter().enumerate() {
            if let Some(first) = self.producers.get(port.name()) {
                return Err(BuildError::DuplicateOutput {
                    quantity: port.name().to_owned(),
                    first: first.clone(),
                    second: producer,
                });
            }
            if block.outputs()[..i].iter().any(|p| p.name() == port.name()) {
                return Err(BuildError::DuplicateOutput {
                    quantity: port.name().to_owned(),
                    first: producer.clone(),
                    second: producer,
                });
            }
        }
        for port in block.inputs() {
            if self.constraints.iter().any(|c| c.name() == port.name()) {
                return Err(BuildError::ConstraintAsInput {
                    constraint: port.name().to_owned(),
                    block: block.id().to_owned(),
                });
            }
        }
        self.check_ports(
            &format!("block `{}`", block.id()),
            block.inputs().iter().chain(block.outputs()),
        )
    }

    fn commit_block(&mut self, block: Block) {
        self.declare(block.inputs().iter().chain(block.outputs()));
        let producer = Producer::Block(block.id().to_owned());
        for port in block.outputs() {
            self.producers.insert(port.name().to_owned(), producer.clone());
        }
        for port in block.inputs() {
            self.consumers
                .entry(port.name().to_owned())
                .or_insert_with(|| block.id().to_owned());
        }
        tracing::trace!(block = block.id(), "registered block");
        self.blocks.push(block);
    }

    fn check_parameter(&self, parameter: &Parameter) -> Result<(), BuildError> {
        if let Some(first) = self.producers.get(parameter.name()) {
            return Err(BuildError::DuplicateOutput {
                quantity: parameter.name().to_owned(),
                first: first.clone(),
                second: parameter.producer(),
            });
        }
        let port = Port::new(parameter.name(), parameter.dimension());
        self.check_ports(
            &format!("parameter `{}`", parameter.name()),
            std::iter::once(&port),
        )
    }

    fn commit_parameter(&mut self, parameter: Parameter) {
        let port = Port::new(parameter.name(), parameter.dimension());
        self.declare(std::iter::once(&port));
        self.producers
            .insert(parameter.name().to_owned(), parameter.producer());
        self.parameters.push(parameter);
    }

    fn check_id(&self, id: &str) -> Result<(), BuildError> {
        if self
            .blocks
            .iter()
            .chain(&self.bootstraps)
            .any(|b| b.id() == id)
        {
            return Err(BuildError::DuplicateBlock { id: id.to_owned() });
        }
        Ok(())
    }

    fn check_ports<'p>(
        &self,
        owner: &str,
        ports: impl Iterator<Item = &'p Port>,
    ) -> Result<(), BuildError> {
        let mut local: HashMap<&str, Dimension> = HashMap::new();
        for port in ports {
            let earlier = self
                .declarations
                .get(port.name())
                .copied()
                .or_else(|| local.get(port.name()).copied());
            match earlier {
                Some(expected) if expected != port.dimension() => {
                    return Err(BuildError::UnitMismatch {
                        quantity: port.name().to_owned(),
                        expected,
                        found: port.dimension(),
                        declared_by: owner.to_owned(),
                    });
                }
                Some(_) => {}
                None => {
                    local.insert(port.name(), port.dimension());
                }
            }
        }
        Ok(())
    }

    fn declare<'p>(&mut self, ports: impl Iterator<Item = &'p Port>) {
        for port in ports {
            self.declarations
                .entry(port.name().to_owned())
                .or_insert(port.dimension());
        }
    }

    /// Every block, bootstrap and constraint input must have a producer.
    fn check_resolved(&self) -> Result<(), BuildError> {
        let readers = self
            .blocks
            .iter()
            .map(|b| (format!("block `{}`", b.id()), b.inputs()))
            .chain(
                self.bootstraps
                    .iter()
                    .map(|b| (format!("bootstrap `{}`", b.id()), b.inputs())),
            )
            .chain(
                self.constraints
                    .iter()
                    .map(|c| (format!("constraint `{}`", c.name()), c.inputs())),
            );
        for (reader, inputs) in readers {
            if let Some(port) = inputs
                .iter()
                .find(|port| !self.producers.contains_key(port.name()))
            {
                return Err(BuildError::UnresolvedInput {
                    quantity: port.name().to_owned(),
                    required_by: reader,
                });
            }
        }
        for (target, bootstrap) in &self.bootstrapped {
            if !self.producers.contains_key(target) {
                return Err(BuildError::BootstrapOutsideCycle {
                    bootstrap: bootstrap.clone(),
                    quantity: target.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::f64::{ElectricCurrent, ElectricPotential, Length, Mass, Power};

    use crate::{
        mda::{
            Value,
            test_support::{current_block, power_loop_registry, voltage_block, voltage_guess},
        },
        support::{bound::Interval, units::SiQuantity},
    };

    fn battery(id: &str) -> Block {
        Block::builder(id)
            .input::<f64>("battery:cells")
            .output::<Mass>("battery:mass")
            .compute(|inputs| Ok(vec![Value::si::<Mass>(0.05 * inputs.scalar(0)?)]))
    }

    #[test]
    fn unresolved_input_names_quantity_and_reader() {
        let mut registry = Registry::new();
        registry
            .register(
                Block::builder("reader")
                    .input::<f64>("x:y")
                    .output::<f64>("z")
                    .compute(|_| Ok(vec![Value::dimensionless(0.0)])),
            )
            .unwrap();

        assert_eq!(
            registry.build().unwrap_err(),
            BuildError::UnresolvedInput {
                quantity: "x:y".into(),
                required_by: "block `reader`".into(),
            }
        );
    }

    #[test]
    fn constraint_inputs_must_be_produced() {
        let mut registry = Registry::new();
        registry
            .constraint(Constraint::margin::<Mass>("mass:margin", "mass:max", "mass"))
            .unwrap();

        let err = registry.build().unwrap_err();
        assert_eq!(
            err,
            BuildError::UnresolvedInput {
                quantity: "mass:max".into(),
                required_by: "constraint `mass:margin`".into(),
            }
        );
    }

    #[test]
    fn duplicate_output_names_both_producers() {
        let mut registry = Registry::new();
        registry.register(battery("battery:sizing")).unwrap();
        let err = registry.register(battery("battery:catalog")).unwrap_err();

        assert_eq!(
            err,
            BuildError::DuplicateOutput {
                quantity: "battery:mass".into(),
                first: Producer::Block("battery:sizing".into()),
                second: Producer::Block("battery:catalog".into()),
            }
        );
        assert_eq!(
            err.to_string(),
            "`battery:mass` is produced by both block `battery:sizing` and block `battery:catalog`"
        );
    }

    #[test]
    fn parameter_cannot_shadow_block_output() {
        let mut registry = Registry::new();
        registry.register(battery("battery:sizing")).unwrap();
        let err = registry
            .parameter(Parameter::constant("battery:mass", 1.0))
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateOutput { .. }));
    }

    #[test]
    fn unit_mismatch_is_caught_at_registration() {
        let mut registry = Registry::new();
        registry.register(battery("battery:sizing")).unwrap();
        let err = registry
            .register(
                Block::builder("frame")
                    .input::<Length>("battery:mass")
                    .output::<Mass>("frame:mass")
                    .compute(|_| Ok(vec![Value::si::<Mass>(1.0)])),
            )
            .unwrap_err();

        assert_eq!(
            err,
            BuildError::UnitMismatch {
                quantity: "battery:mass".into(),
                expected: Mass::dimension(),
                found: Length::dimension(),
                declared_by: "block `frame`".into(),
            }
        );
    }

    #[test]
    fn failed_registration_leaves_registry_unchanged() {
        let mut registry = power_loop_registry();
        registry
            .register(
                Block::builder("bad")
                    .input::<Mass>("bus:voltage")
                    .output::<f64>("unused")
                    .compute(|_| Ok(vec![Value::dimensionless(0.0)])),
            )
            .unwrap_err();

        assert!(registry.build().is_ok());
    }

    #[test]
    fn failed_deviation_registration_adds_no_parameters() {
        let motor = |id: &str| {
            Block::builder(id)
                .output::<Mass>("motor:mass")
                .compute(|_| Ok(vec![Value::si::<Mass>(0.4)]))
        };
        let mut registry = Registry::new();
        registry.register(motor("motor:catalog")).unwrap();

        let err = registry
            .register_with_deviation(motor("motor:scaling"), &Deviation::on("motor:mass"))
            .unwrap_err();

        assert_eq!(
            err,
            BuildError::DuplicateOutput {
                quantity: "motor:mass".into(),
                first: Producer::Block("motor:catalog".into()),
                second: Producer::Block("motor:scaling".into()),
            }
        );
        assert!(registry.parameters.is_empty());
        assert!(!registry.declarations.contains_key("uncertainty:motor:mass:rel"));

        let engine = registry.build().unwrap();
        assert_eq!(engine.parameters().count(), 0);
    }

    #[test]
    fn deviation_parameters_are_registered_with_their_block() {
        let mut registry = Registry::new();
        registry
            .register_with_deviation(
                Block::builder("motor:scaling")
                    .output::<Mass>("motor:mass")
                    .compute(|_| Ok(vec![Value::si::<Mass>(0.4)])),
                &Deviation::on("motor:mass"),
            )
            .unwrap();

        let names: Vec<&str> = registry.parameters.iter().map(Parameter::name).collect();
        assert_eq!(
            names,
            ["uncertainty:motor:mass:rel", "uncertainty:motor:mass:abs"]
        );
        assert_eq!(registry.blocks.len(), 1);
    }

    #[test]
    fn block_ids_are_unique() {
        let mut registry = Registry::new();
        registry.register(current_block()).unwrap();
        let err = registry
            .register(
                Block::builder("load:current")
                    .output::<f64>("other")
                    .compute(|_| Ok(vec![Value::dimensionless(0.0)])),
            )
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateBlock {
                id: "load:current".into()
            }
        );
    }

    #[test]
    fn constraints_cannot_be_read_by_blocks() {
        let reader = || {
            Block::builder("reader")
                .input::<f64>("frame:margin")
                .output::<f64>("z")
                .compute(|_| Ok(vec![Value::dimensionless(0.0)]))
        };
        let margin = || Constraint::margin::<f64>("frame:margin", "a", "b");
        let expected = BuildError::ConstraintAsInput {
            constraint: "frame:margin".into(),
            block: "reader".into(),
        };

        let mut registry = Registry::new();
        registry.constraint(margin()).unwrap();
        assert_eq!(registry.register(reader()).unwrap_err(), expected);

        let mut registry = Registry::new();
        registry.register(reader()).unwrap();
        assert_eq!(registry.constraint(margin()).unwrap_err(), expected);
    }

    #[test]
    fn bootstrap_must_have_one_output() {
        let mut registry = Registry::new();
        let err = registry
            .bootstrap(
                Block::builder("guess")
                    .output::<f64>("a")
                    .output::<f64>("b")
                    .compute(|_| Ok(vec![Value::dimensionless(0.0); 2])),
            )
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidBootstrap {
                id: "guess".into(),
                outputs: 2,
            }
        );
    }

    #[test]
    fn one_bootstrap_per_quantity() {
        let mut registry = power_loop_registry();
        let err = registry
            .bootstrap(
                Block::builder("bus:voltage:other")
                    .output::<ElectricPotential>("bus:voltage")
                    .compute(|_| Ok(vec![Value::si::<ElectricPotential>(12.0)])),
            )
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateBootstrap {
                quantity: "bus:voltage".into(),
                first: "bus:voltage:guess".into(),
                second: "bus:voltage:other".into(),
            }
        );
    }

    #[test]
    fn cycle_without_bootstrap_is_rejected() {
        let mut registry = Registry::new();
        registry
            .parameter(Parameter::design_variable::<Power>(
                "load:power",
                Interval::UNBOUNDED,
            ))
            .unwrap()
            .register(current_block())
            .unwrap()
            .register(voltage_block())
            .unwrap();

        let err = registry.build().unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingBootstrap {
                blocks: vec!["load:current".into(), "source:voltage".into()],
                quantity: "bus:voltage".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "cycle [load:current, source:voltage] needs a bootstrap for `bus:voltage`"
        );
    }

    #[test]
    fn every_cycle_block_must_be_reachable_from_bootstraps() {
        // z = x + y, x = z / 2, y = z / 3 + 1: seeding x alone leaves every
        // block waiting on z or y.
        let sum = || {
            Block::builder("a")
                .input::<f64>("x")
                .input::<f64>("y")
                .output::<f64>("z")
                .compute(|inputs| Ok(vec![Value::dimensionless(inputs.scalar(0)? + inputs.scalar(1)?)]))
        };
        let half = || {
            Block::builder("b")
                .input::<f64>("z")
                .output::<f64>("x")
                .compute(|inputs| Ok(vec![Value::dimensionless(inputs.scalar(0)? / 2.0)]))
        };
        let third = || {
            Block::builder("c")
                .input::<f64>("z")
                .output::<f64>("y")
                .compute(|inputs| Ok(vec![Value::dimensionless(inputs.scalar(0)? / 3.0 + 1.0)]))
        };
        let guess = |target: &str| {
            Block::builder(format!("{target}:guess"))
                .output::<f64>(target)
                .compute(|_| Ok(vec![Value::dimensionless(1.0)]))
        };

        let mut registry = Registry::new();
        registry
            .register(sum())
            .unwrap()
            .register(half())
            .unwrap()
            .register(third())
            .unwrap()
            .bootstrap(guess("x"))
            .unwrap();
        assert_eq!(
            registry.build().unwrap_err(),
            BuildError::MissingBootstrap {
                blocks: vec!["a".into(), "b".into(), "c".into()],
                quantity: "y".into(),
            }
        );

        let mut registry = Registry::new();
        registry
            .register(sum())
            .unwrap()
            .register(half())
            .unwrap()
            .register(third())
            .unwrap()
            .bootstrap(guess("x"))
            .unwrap()
            .bootstrap(guess("y"))
            .unwrap();
        assert!(registry.build().is_ok());
    }

    #[test]
    fn bootstrap_may_not_depend_on_its_cycle() {
        let mut registry = Registry::new();
        registry
            .parameter(Parameter::design_variable::<Power>(
                "load:power",
                Interval::UNBOUNDED,
            ))
            .unwrap()
            .register(current_block())
            .unwrap()
            .register(voltage_block())
            .unwrap()
            .bootstrap(
                Block::builder("bus:voltage:from_current")
                    .input::<ElectricCurrent>("bus:current")
                    .output::<ElectricPotential>("bus:voltage")
                    .compute(|_| Ok(vec![Value::si::<ElectricPotential>(10.0)])),
            )
            .unwrap();

        assert_eq!(
            registry.build().unwrap_err(),
            BuildError::BootstrapInCycle {
                bootstrap: "bus:voltage:from_current".into(),
                quantity: "bus:voltage".into(),
            }
        );
    }

    #[test]
    fn bootstrap_must_target_a_cycle() {
        let mut registry = Registry::new();
        registry
            .parameter(Parameter::constant("battery:cells", 6.0))
            .unwrap()
            .register(battery("battery:sizing"))
            .unwrap()
            .bootstrap(
                Block::builder("battery:mass:guess")
                    .output::<Mass>("battery:mass")
                    .compute(|_| Ok(vec![Value::si::<Mass>(1.0)])),
            )
            .unwrap();

        assert_eq!(
            registry.build().unwrap_err(),
            BuildError::BootstrapOutsideCycle {
                bootstrap: "battery:mass:guess".into(),
                quantity: "battery:mass".into(),
            }
        );

        let mut registry = Registry::new();
        registry.bootstrap(voltage_guess(10.0)).unwrap();
        assert!(matches!(
            registry.build(),
            Err(BuildError::BootstrapOutsideCycle { .. })
        ));
    }

    #[test]
    fn registration_order_does_not_matter() {
        let mut registry = Registry::new();
        registry
            .bootstrap(voltage_guess(10.0))
            .unwrap()
            .register(voltage_block())
            .unwrap()
            .register(current_block())
            .unwrap()
            .parameter(
                Parameter::design_variable::<Power>(
                    "load:power",
                    Interval::UNBOUNDED,
                )
                .with_default(100.0),
            )
            .unwrap();

        assert!(registry.build().is_ok());
    }
}
