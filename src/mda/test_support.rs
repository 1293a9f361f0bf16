//! Small block networks shared by the engine's unit tests.

use uom::si::f64::{ElectricCurrent, ElectricPotential, Power};

use crate::support::{bound::Interval, units::SiQuantity};

use super::{Block, Constraint, DesignPoint, Engine, Parameter, Registry, Value};

pub(crate) fn point(entries: &[(&str, f64)]) -> DesignPoint {
    entries
        .iter()
        .map(|&(name, value)| (name.to_owned(), value))
        .collect()
}

pub(crate) fn current_block() -> Block {
    Block::builder("load:current")
        .input::<Power>("load:power")
        .input::<ElectricPotential>("bus:voltage")
        .output::<ElectricCurrent>("bus:current")
        .compute(|inputs| {
            let p = inputs.scalar(0)?;
            let v = inputs.scalar(1)?;
            Ok(vec![Value::si::<ElectricCurrent>(p / v)])
        })
}

pub(crate) fn voltage_block() -> Block {
    Block::builder("source:voltage")
        .input::<ElectricCurrent>("bus:current")
        .output::<ElectricPotential>("bus:voltage")
        .compute(|inputs| {
            let i = inputs.scalar(0)?;
            Ok(vec![Value::si::<ElectricPotential>(0.1 * i + 5.0)])
        })
}

pub(crate) fn voltage_guess(volts: f64) -> Block {
    Block::builder("bus:voltage:guess")
        .output::<ElectricPotential>("bus:voltage")
        .compute(move |_| Ok(vec![Value::si::<ElectricPotential>(volts)]))
}

/// Registry for `I = P/V`, `V = 0.1·I + 5`, starting from `V = 10`.
///
/// With `P = 100 W` the fixed point is `V = (5 + √65) / 2`.
pub(crate) fn power_loop_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .parameter(
            Parameter::design_variable::<Power>("load:power", Interval::new(0.0, 1e4).unwrap())
                .with_default(100.0),
        )
        .unwrap()
        .register(current_block())
        .unwrap()
        .register(voltage_block())
        .unwrap()
        .bootstrap(voltage_guess(10.0))
        .unwrap();
    registry
}

pub(crate) fn power_loop() -> Engine {
    power_loop_registry()
        .build()
        .expect("power loop should build")
}

pub(crate) const POWER_LOOP_VOLTAGE: f64 = 6.531_128_874_149_275;

/// A single block iterating the logistic map `x ← r·x·(1 − x)` from `x = 0.2`.
pub(crate) fn logistic(r: f64) -> Engine {
    let mut registry = Registry::new();
    registry
        .parameter(Parameter::constant("r", r))
        .unwrap()
        .register(
            Block::builder("logistic")
                .input::<f64>("r")
                .input::<f64>("x")
                .output::<f64>("x")
                .compute(|inputs| {
                    let r = inputs.scalar(0)?;
                    let x = inputs.scalar(1)?;
                    Ok(vec![Value::dimensionless(r * x * (1.0 - x))])
                }),
        )
        .unwrap()
        .bootstrap(
            Block::builder("x:guess")
                .output::<f64>("x")
                .compute(|_| Ok(vec![Value::dimensionless(0.2)])),
        )
        .unwrap();
    registry.build().expect("logistic map should build")
}

/// `y = x²` with the constraint `(limit − y) / limit`, `x ∈ [0, 10]`.
pub(crate) fn square_with_limit(limit: f64) -> Engine {
    let mut registry = Registry::new();
    registry
        .parameter(Parameter::design_variable::<f64>("x", Interval::new(0.0, 10.0).unwrap()).with_default(1.0))
        .unwrap()
        .parameter(Parameter::constant("y:max", limit))
        .unwrap()
        .register(
            Block::builder("square")
                .input::<f64>("x")
                .output::<f64>("y")
                .compute(|inputs| {
                    let x = inputs.scalar(0)?;
                    Ok(vec![Value::dimensionless(x * x)])
                }),
        )
        .unwrap()
        .constraint(Constraint::margin::<f64>("y:margin", "y:max", "y"))
        .unwrap();
    registry.build().expect("square should build")
}

/// Asserts `dimension_of(value) == Q::dimension()`.
pub(crate) fn has_dimension<Q: SiQuantity>(value: &Value) -> bool {
    value.dimension() == Q::dimension()
}
