//! Battery sizing, the terminal-voltage loop and endurance.
//!
//! The terminal voltage sags with the current drawn, and the current drawn
//! at fixed power rises as the voltage sags, so the two form a cycle seeded
//! from the open-circuit voltage.

use uom::si::f64::{ElectricCharge, ElectricCurrent, ElectricPotential, ElectricalResistance, Mass, Power, Time};

use crate::{
    mda::{Block, BlockError, Value},
    support::bound::Interval,
};

use super::names;

/// Reference cell pack: mass, capacity (C), voltage, max current and
/// internal resistance.
const BATTERY_MASS_REF: f64 = 0.329;
const BATTERY_CAPACITY_REF: f64 = 3.4 * 3600.0;
const BATTERY_VOLTAGE_REF: f64 = 4.0 * 3.7;
const BATTERY_CURRENT_MAX_REF: f64 = 170.0;
const BATTERY_RESISTANCE_REF: f64 = 0.02;

/// Empirical open-circuit voltage estimate from takeoff shaft power, in V/W^0.36.
const VOLTAGE_PER_POWER: f64 = 1.84;
const VOLTAGE_POWER_EXPONENT: f64 = 0.36;

pub(super) fn battery_mass() -> Block {
    Block::builder("battery:weight")
        .input::<f64>(names::BATTERY_MASS_RATIO)
        .input::<Mass>(names::PAYLOAD)
        .output_within::<Mass>(names::BATTERY_MASS, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let ratio = inputs.scalar(0)?;
            let payload: Mass = inputs.quantity(1)?;
            Ok(vec![Value::new(payload * ratio)])
        })
}

pub(super) fn open_circuit_voltage() -> Block {
    Block::builder("battery:voltage:open_circuit")
        .input::<Power>(names::PROPELLER_POWER_TAKEOFF)
        .input::<f64>(names::BATTERY_VOLTAGE_RATIO)
        .output_within::<ElectricPotential>(
            names::BATTERY_OPEN_CIRCUIT_VOLTAGE,
            Interval::NON_NEGATIVE,
        )
        .compute(|inputs| {
            let power = inputs.scalar(0)?;
            let ratio = inputs.scalar(1)?;
            Ok(vec![Value::si::<ElectricPotential>(
                ratio * VOLTAGE_PER_POWER * power.powf(VOLTAGE_POWER_EXPONENT),
            )])
        })
}

/// Pack resistance: more cells in series raise it, more cells in parallel lower it.
pub(super) fn internal_resistance() -> Block {
    Block::builder("battery:resistance")
        .input::<ElectricPotential>(names::BATTERY_OPEN_CIRCUIT_VOLTAGE)
        .input::<Mass>(names::BATTERY_MASS)
        .output_within::<ElectricalResistance>(names::BATTERY_RESISTANCE, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let voltage = inputs.scalar(0)?;
            let mass = inputs.scalar(1)?;
            if mass <= 0.0 {
                return Err(BlockError::rejected("battery mass must be positive"));
            }
            let series = voltage / BATTERY_VOLTAGE_REF;
            Ok(vec![Value::si::<ElectricalResistance>(
                BATTERY_RESISTANCE_REF * series.powi(2) * BATTERY_MASS_REF / mass,
            )])
        })
}

/// Battery current feeding every motor through its speed controller.
pub(super) fn battery_current(id: &str, motor_power: &str, current: &str) -> Block {
    Block::builder(id)
        .input::<Power>(motor_power)
        .input::<f64>(names::ARMS)
        .input::<f64>(names::ESC_EFFICIENCY)
        .input::<ElectricPotential>(names::BATTERY_VOLTAGE)
        .output::<ElectricCurrent>(current)
        .compute(|inputs| {
            let power = inputs.scalar(0)?;
            let arms = inputs.scalar(1)?;
            let efficiency = inputs.scalar(2)?;
            let voltage = inputs.scalar(3)?;
            if voltage <= 0.0 {
                return Err(BlockError::rejected("battery voltage collapsed"));
            }
            Ok(vec![Value::si::<ElectricCurrent>(
                arms * power / (efficiency * voltage),
            )])
        })
}

/// `V = V_oc − R·I` at hover.
pub(super) fn terminal_voltage() -> Block {
    Block::builder("battery:voltage:terminal")
        .input::<ElectricPotential>(names::BATTERY_OPEN_CIRCUIT_VOLTAGE)
        .input::<ElectricalResistance>(names::BATTERY_RESISTANCE)
        .input::<ElectricCurrent>(names::BATTERY_CURRENT_HOVER)
        .output_within::<ElectricPotential>(names::BATTERY_VOLTAGE, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let open_circuit = inputs.scalar(0)?;
            let resistance = inputs.scalar(1)?;
            let current = inputs.scalar(2)?;
            Ok(vec![Value::si::<ElectricPotential>(
                open_circuit - resistance * current,
            )])
        })
}

/// Starts the voltage loop at the unloaded voltage.
pub(super) fn terminal_voltage_guess() -> Block {
    Block::builder("battery:voltage:terminal:guess")
        .input::<ElectricPotential>(names::BATTERY_OPEN_CIRCUIT_VOLTAGE)
        .output::<ElectricPotential>(names::BATTERY_VOLTAGE)
        .compute(|inputs| Ok(vec![inputs.value(0)?.clone()]))
}

/// Capacity and maximum discharge current, scaled on the reference pack's
/// energy density.
pub(super) fn capacity() -> Block {
    Block::builder("battery:capacity")
        .input::<Mass>(names::BATTERY_MASS)
        .input::<ElectricPotential>(names::BATTERY_OPEN_CIRCUIT_VOLTAGE)
        .output_within::<ElectricCharge>(names::BATTERY_CAPACITY, Interval::NON_NEGATIVE)
        .output_within::<ElectricCurrent>(names::BATTERY_CURRENT_MAX, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let mass = inputs.scalar(0)?;
            let voltage = inputs.scalar(1)?;

            let capacity =
                mass / BATTERY_MASS_REF * BATTERY_CAPACITY_REF * BATTERY_VOLTAGE_REF / voltage;
            Ok(vec![
                Value::si::<ElectricCharge>(capacity),
                Value::si::<ElectricCurrent>(
                    BATTERY_CURRENT_MAX_REF * capacity / BATTERY_CAPACITY_REF,
                ),
            ])
        })
}

pub(super) fn hover_endurance() -> Block {
    Block::builder("mission:endurance")
        .input::<ElectricCharge>(names::BATTERY_CAPACITY)
        .input::<ElectricCurrent>(names::BATTERY_CURRENT_HOVER)
        .input::<f64>(names::DISCHARGE_DEPTH)
        .output_within::<Time>(names::ENDURANCE_HOVER, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let capacity: ElectricCharge = inputs.quantity(0)?;
            let current: ElectricCurrent = inputs.quantity(1)?;
            let depth = inputs.scalar(2)?;
            let endurance: Time = capacity * depth / current;
            Ok(vec![Value::new(endurance)])
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::mda::Inputs;

    fn run(block: &Block, values: &[Value]) -> Result<Vec<f64>, BlockError> {
        let refs: Vec<&Value> = values.iter().collect();
        let outputs = block.evaluate(&Inputs::new(block.inputs(), &refs))?;
        Ok(outputs.iter().map(|v| v.as_scalar().unwrap()).collect())
    }

    #[test]
    fn reference_pack_is_reproduced() {
        let resistance = run(
            &internal_resistance(),
            &[
                Value::si::<ElectricPotential>(BATTERY_VOLTAGE_REF),
                Value::si::<Mass>(BATTERY_MASS_REF),
            ],
        )
        .unwrap();
        assert_relative_eq!(resistance[0], BATTERY_RESISTANCE_REF);

        let capacity = run(
            &capacity(),
            &[
                Value::si::<Mass>(BATTERY_MASS_REF),
                Value::si::<ElectricPotential>(BATTERY_VOLTAGE_REF),
            ],
        )
        .unwrap();
        assert_relative_eq!(capacity[0], BATTERY_CAPACITY_REF);
        assert_relative_eq!(capacity[1], BATTERY_CURRENT_MAX_REF);
    }

    #[test]
    fn endurance_is_usable_charge_over_current() {
        let endurance = run(
            &hover_endurance(),
            &[
                Value::si::<ElectricCharge>(36_000.0),
                Value::si::<ElectricCurrent>(40.0),
                Value::dimensionless(0.8),
            ],
        )
        .unwrap();
        assert_relative_eq!(endurance[0], 720.0);
    }

    #[test]
    fn collapsed_voltage_is_rejected() {
        let result = run(
            &battery_current("battery:hover", names::MOTOR_POWER_HOVER, names::BATTERY_CURRENT_HOVER),
            &[
                Value::si::<Power>(300.0),
                Value::dimensionless(4.0),
                Value::dimensionless(0.95),
                Value::si::<ElectricPotential>(0.0),
            ],
        );
        assert!(matches!(result, Err(BlockError::Rejected { .. })));
    }
}
