//! Flight scenarios, structure and the takeoff-mass summation.
//!
//! Together with the propulsion chain these blocks close the MTOW loop:
//! thrust depends on takeoff mass, and every component mass depends on thrust.

use uom::si::f64::{Acceleration, Force, Mass};

use crate::{
    mda::{Block, Value},
    support::bound::Interval,
};

use super::names;

/// Hover thrust per arm carries the takeoff mass; takeoff thrust is a fixed
/// multiple of it.
pub(super) fn scenario_thrust() -> Block {
    Block::builder("scenario:thrust")
        .input::<Mass>(names::MTOW)
        .input::<Acceleration>(names::GRAVITY)
        .input::<f64>(names::ARMS)
        .input::<f64>(names::TAKEOFF_THRUST_RATIO)
        .output_within::<Force>(names::THRUST_HOVER, Interval::NON_NEGATIVE)
        .output_within::<Force>(names::THRUST_TAKEOFF, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let mtow: Mass = inputs.quantity(0)?;
            let gravity: Acceleration = inputs.quantity(1)?;
            let arms = inputs.scalar(2)?;
            let takeoff_ratio = inputs.scalar(3)?;

            let hover: Force = mtow * gravity / arms;
            Ok(vec![Value::new(hover), Value::new(hover * takeoff_ratio)])
        })
}

/// Arms and frame, scaled on the total takeoff thrust.
pub(super) fn structure_mass() -> Block {
    Block::builder("structure:weight")
        .input::<Force>(names::THRUST_TAKEOFF)
        .input::<f64>(names::ARMS)
        .input::<Acceleration>(names::GRAVITY)
        .input::<f64>(names::FRAME_MASS_RATIO)
        .output_within::<Mass>(names::STRUCTURE_MASS, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let thrust: Force = inputs.quantity(0)?;
            let arms = inputs.scalar(1)?;
            let gravity: Acceleration = inputs.quantity(2)?;
            let ratio = inputs.scalar(3)?;

            let mass: Mass = thrust * (ratio * arms) / gravity;
            Ok(vec![Value::new(mass)])
        })
}

/// Sums payload, battery, per-arm propulsion and structure.
pub(super) fn takeoff_mass() -> Block {
    Block::builder("weight:mtow")
        .input::<Mass>(names::PAYLOAD)
        .input::<Mass>(names::BATTERY_MASS)
        .input::<f64>(names::ARMS)
        .input::<Mass>(names::MOTOR_MASS)
        .input::<Mass>(names::ESC_MASS)
        .input::<Mass>(names::PROPELLER_MASS)
        .input::<Mass>(names::STRUCTURE_MASS)
        .output_within::<Mass>(names::MTOW, Interval::NON_NEGATIVE)
        .compute(|inputs| {
            let payload: Mass = inputs.quantity(0)?;
            let battery: Mass = inputs.quantity(1)?;
            let arms = inputs.scalar(2)?;
            let motor: Mass = inputs.quantity(3)?;
            let esc: Mass = inputs.quantity(4)?;
            let propeller: Mass = inputs.quantity(5)?;
            let structure: Mass = inputs.quantity(6)?;

            let mtow = payload + battery + (motor + esc + propeller) * arms + structure;
            Ok(vec![Value::new(mtow)])
        })
}

/// First MTOW estimate, a multiple of the payload.
pub(super) fn takeoff_mass_guess() -> Block {
    Block::builder("weight:mtow:guess")
        .input::<Mass>(names::PAYLOAD)
        .input::<f64>(names::MTOW_GUESS_RATIO)
        .output::<Mass>(names::MTOW)
        .compute(|inputs| {
            let payload: Mass = inputs.quantity(0)?;
            let ratio = inputs.scalar(1)?;
            Ok(vec![Value::new(payload * ratio)])
        })
}
