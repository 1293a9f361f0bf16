//! Propellers, motors and speed controllers.
//!
//! Components are sized by scaling laws around a reference catalogue part:
//! a quantity `y` of a part with defining parameter `x` follows
//! `y = y_ref · (x / x_ref)^k`.

use std::f64::consts::PI;

use uom::si::f64::{
    AngularVelocity, ElectricCurrent, ElectricPotential, ElectricalResistance, Force, Length,
    Mass, MassDensity, Power, Torque,
};

use crate::{
    mda::{Block, BlockError, Value},
    support::{bound::Interval, units::TorqueConstant},
};

use super::names;

/// Reference propeller: mass and diameter.
const PROPELLER_MASS_REF: f64 = 0.015;
const PROPELLER_DIAMETER_REF: f64 = 0.254;

/// Reference motor: nominal torque, max torque, mass, resistance,
/// torque constant and friction torque.
const MOTOR_TORQUE_REF: f64 = 2.32;
const MOTOR_TORQUE_MAX_REF: f64 = 2.32 * 85.0 / 70.0;
const MOTOR_MASS_REF: f64 = 0.575;
const MOTOR_RESISTANCE_REF: f64 = 0.03;
const MOTOR_KT_REF: f64 = 0.03;
const MOTOR_FRICTION_REF: f64 = 0.03;

/// Reference speed controller: power, mass and oversizing.
const ESC_POWER_REF: f64 = 3108.0;
const ESC_MASS_REF: f64 = 0.115;
const ESC_OVERSIZING: f64 = 1.2;

#[derive(Debug, Clone, Copy)]
pub(super) enum Scenario {
    Hover,
    Takeoff,
}

impl Scenario {
    fn label(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Takeoff => "takeoff",
        }
    }

    fn thrust(self) -> &'static str {
        match self {
            Self::Hover => names::THRUST_HOVER,
            Self::Takeoff => names::THRUST_TAKEOFF,
        }
    }

    fn propeller_speed(self) -> &'static str {
        match self {
            Self::Hover => names::PROPELLER_SPEED_HOVER,
            Self::Takeoff => names::PROPELLER_SPEED_TAKEOFF,
        }
    }

    fn propeller_torque(self) -> &'static str {
        match self {
            Self::Hover => names::PROPELLER_TORQUE_HOVER,
            Self::Takeoff => names::PROPELLER_TORQUE_TAKEOFF,
        }
    }

    fn propeller_power(self) -> &'static str {
        match self {
            Self::Hover => names::PROPELLER_POWER_HOVER,
            Self::Takeoff => names::PROPELLER_POWER_TAKEOFF,
        }
    }

    pub(super) fn motor_current(self) -> &'static str {
        match self {
            Self::Hover => names::MOTOR_CURRENT_HOVER,
            Self::Takeoff => names::MOTOR_CURRENT_TAKEOFF,
        }
    }

    pub(super) fn motor_voltage(self) -> &'static str {
        match self {
            Self::Hover => names::MOTOR_VOLTAGE_HOVER,
            Self::Takeoff => names::MOTOR_VOLTAGE_TAKEOFF,
        }
    }

    pub(super) fn motor_power(self) -> &'static str {
        match self {
            Self::Hover => names::MOTOR_POWER_HOVER,
            Self::Takeoff => names::MOTOR_POWER_TAKEOFF,
        }
    }
}

pub(super) fn propeller_mass() -> Block {
    Block::builder("propeller:weight")
        .input::<Length>(names::PROPELLER_DIAMETER)
        .output_within::<Mass>(names::PROPELLER_MASS, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let diameter = inputs.scalar(0)?;
            let mass = PROPELLER_MASS_REF * (diameter / PROPELLER_DIAMETER_REF).powi(3);
            Ok(vec![Value::si::<Mass>(mass)])
        })
}

/// Static propeller performance from thrust and power coefficients.
///
/// With `n` in rev/s: `F = C_T·ρ·n²·D⁴` and `P = C_P·ρ·n³·D⁵`.
pub(super) fn propeller_performance(scenario: Scenario) -> Block {
    Block::builder(format!("propeller:{}", scenario.label()))
        .input::<Force>(scenario.thrust())
        .input::<Length>(names::PROPELLER_DIAMETER)
        .input::<MassDensity>(names::AIR_DENSITY)
        .input::<f64>(names::THRUST_COEFFICIENT)
        .input::<f64>(names::POWER_COEFFICIENT)
        .output_within::<AngularVelocity>(scenario.propeller_speed(), Interval::NON_NEGATIVE)
        .output_within::<Torque>(scenario.propeller_torque(), Interval::NON_NEGATIVE)
        .output_within::<Power>(scenario.propeller_power(), Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let thrust = inputs.scalar(0)?;
            let diameter = inputs.scalar(1)?;
            let rho = inputs.scalar(2)?;
            let c_t = inputs.scalar(3)?;
            let c_p = inputs.scalar(4)?;

            let n = (thrust / (c_t * rho * diameter.powi(4))).sqrt();
            let speed = 2.0 * PI * n;
            let power = c_p * rho * n.powi(3) * diameter.powi(5);
            Ok(vec![
                Value::si::<AngularVelocity>(speed),
                Value::si::<Torque>(power / speed),
                Value::si::<Power>(power),
            ])
        })
}

/// Motor sized on hover torque: nominal and peak torque, and mass.
pub(super) fn motor_sizing() -> Block {
    Block::builder("motor:sizing")
        .input::<Torque>(names::PROPELLER_TORQUE_HOVER)
        .input::<f64>(names::MOTOR_TORQUE_RATIO)
        .output_within::<Torque>(names::MOTOR_TORQUE_NOMINAL, Interval::NON_NEGATIVE)
        .output_within::<Torque>(names::MOTOR_TORQUE_MAX, Interval::NON_NEGATIVE)
        .output_within::<Mass>(names::MOTOR_MASS, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let hover_torque = inputs.scalar(0)?;
            let ratio = inputs.scalar(1)?;

            let nominal = ratio * hover_torque;
            let scale = nominal / MOTOR_TORQUE_REF;
            Ok(vec![
                Value::si::<Torque>(nominal),
                Value::si::<Torque>(MOTOR_TORQUE_MAX_REF * scale),
                Value::si::<Mass>(MOTOR_MASS_REF * scale.powf(3.0 / 3.5)),
            ])
        })
}

/// Electrical constants of the sized motor.
///
/// The torque constant is chosen so the no-load speed at battery voltage is
/// a margin above the takeoff speed.
pub(super) fn motor_constants() -> Block {
    Block::builder("motor:constants")
        .input::<ElectricPotential>(names::BATTERY_OPEN_CIRCUIT_VOLTAGE)
        .input::<AngularVelocity>(names::PROPELLER_SPEED_TAKEOFF)
        .input::<f64>(names::MOTOR_SPEED_RATIO)
        .input::<Torque>(names::MOTOR_TORQUE_NOMINAL)
        .output_within::<TorqueConstant>(names::MOTOR_TORQUE_CONSTANT, Interval::NON_NEGATIVE)
        .output_within::<ElectricalResistance>(names::MOTOR_RESISTANCE, Interval::NON_NEGATIVE)
        .output_within::<Torque>(names::MOTOR_FRICTION_TORQUE, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let voltage = inputs.scalar(0)?;
            let takeoff_speed = inputs.scalar(1)?;
            let speed_ratio = inputs.scalar(2)?;
            let nominal = inputs.scalar(3)?;

            let kt = voltage / (speed_ratio * takeoff_speed);
            let scale = nominal / MOTOR_TORQUE_REF;
            let resistance =
                MOTOR_RESISTANCE_REF * scale.powf(-5.0 / 3.5) * (kt / MOTOR_KT_REF).powi(2);
            Ok(vec![
                Value::si::<TorqueConstant>(kt),
                Value::si::<ElectricalResistance>(resistance),
                Value::si::<Torque>(MOTOR_FRICTION_REF * scale.powf(3.0 / 3.5)),
            ])
        })
}

/// Current, voltage and electrical power a motor draws at one operating point.
pub(super) fn motor_performance(scenario: Scenario) -> Block {
    Block::builder(format!("motor:{}", scenario.label()))
        .input::<Torque>(scenario.propeller_torque())
        .input::<AngularVelocity>(scenario.propeller_speed())
        .input::<TorqueConstant>(names::MOTOR_TORQUE_CONSTANT)
        .input::<ElectricalResistance>(names::MOTOR_RESISTANCE)
        .input::<Torque>(names::MOTOR_FRICTION_TORQUE)
        .output::<ElectricCurrent>(scenario.motor_current())
        .output::<ElectricPotential>(scenario.motor_voltage())
        .output::<Power>(scenario.motor_power())
        .compute(|inputs| {
            let torque = inputs.scalar(0)?;
            let speed = inputs.scalar(1)?;
            let kt = inputs.scalar(2)?;
            let resistance = inputs.scalar(3)?;
            let friction = inputs.scalar(4)?;

            if kt <= 0.0 {
                return Err(BlockError::rejected("torque constant must be positive"));
            }
            let current = (torque + friction) / kt;
            let voltage = resistance * current + speed * kt;
            Ok(vec![
                Value::si::<ElectricCurrent>(current),
                Value::si::<ElectricPotential>(voltage),
                Value::si::<Power>(voltage * current),
            ])
        })
}

/// Speed controller sized on takeoff electrical power.
pub(super) fn esc_mass() -> Block {
    Block::builder("esc:weight")
        .input::<Power>(names::MOTOR_POWER_TAKEOFF)
        .output_within::<Mass>(names::ESC_MASS, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let power = inputs.scalar(0)?;
            Ok(vec![Value::si::<Mass>(
                ESC_MASS_REF * ESC_OVERSIZING * power / ESC_POWER_REF,
            )])
        })
}
