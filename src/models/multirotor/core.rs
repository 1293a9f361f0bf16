//! Block network of a multirotor sizing.
//!
//! Two cycles need resolving:
//! - the MTOW loop: takeoff mass sets thrust, thrust sizes propellers, motors,
//!   controllers and structure, and those masses sum back into takeoff mass;
//! - the battery loop: terminal voltage sets hover current, and hover current
//!   sags terminal voltage.

mod airframe;
mod design;
mod energy;
pub mod names;
mod propulsion;
mod specs;

pub use design::MultirotorDesign;
pub use specs::MultirotorSpec;

use uom::si::f64::{ElectricCurrent, ElectricPotential, Mass, Time, Torque};

use crate::mda::{BuildError, Constraint, Registry};

use propulsion::Scenario;

/// Registers every block, bootstrap, parameter and constraint.
pub(crate) fn registry(
    spec: &MultirotorSpec,
    design: &MultirotorDesign,
) -> Result<Registry, BuildError> {
    let mut registry = Registry::new();
    spec.register(&mut registry)?;
    design.register(&mut registry)?;

    registry
        .register(airframe::scenario_thrust())?
        .register(propulsion::propeller_mass())?
        .register(propulsion::propeller_performance(Scenario::Hover))?
        .register(propulsion::propeller_performance(Scenario::Takeoff))?
        .register(propulsion::motor_sizing())?
        .register(energy::open_circuit_voltage())?
        .register(propulsion::motor_constants())?
        .register(propulsion::motor_performance(Scenario::Hover))?
        .register(propulsion::motor_performance(Scenario::Takeoff))?
        .register(propulsion::esc_mass())?
        .register(airframe::structure_mass())?
        .register(energy::battery_mass())?
        .register(airframe::takeoff_mass())?
        .bootstrap(airframe::takeoff_mass_guess())?;

    registry
        .register(energy::internal_resistance())?
        .register(energy::battery_current(
            "battery:current:hover",
            Scenario::Hover.motor_power(),
            names::BATTERY_CURRENT_HOVER,
        ))?
        .register(energy::terminal_voltage())?
        .bootstrap(energy::terminal_voltage_guess())?
        .register(energy::battery_current(
            "battery:current:takeoff",
            Scenario::Takeoff.motor_power(),
            names::BATTERY_CURRENT_TAKEOFF,
        ))?
        .register(energy::capacity())?
        .register(energy::hover_endurance())?;

    for constraint in constraints() {
        registry.constraint(constraint)?;
    }
    Ok(registry)
}

/// Normalized constraints, each `>= 0` when satisfied.
fn constraints() -> [Constraint; 5] {
    [
        Constraint::margin::<Mass>(names::MTOW_CONSTRAINT, names::MTOW_MAX, names::MTOW),
        Constraint::margin::<Torque>(
            names::MOTOR_TORQUE_CONSTRAINT,
            names::MOTOR_TORQUE_MAX,
            names::PROPELLER_TORQUE_TAKEOFF,
        ),
        Constraint::margin::<ElectricPotential>(
            names::BATTERY_VOLTAGE_CONSTRAINT,
            names::BATTERY_VOLTAGE,
            names::MOTOR_VOLTAGE_TAKEOFF,
        ),
        Constraint::margin::<ElectricCurrent>(
            names::BATTERY_CURRENT_CONSTRAINT,
            names::BATTERY_CURRENT_MAX,
            names::BATTERY_CURRENT_TAKEOFF,
        ),
        Constraint::builder(names::ENDURANCE_CONSTRAINT)
            .input::<Time>(names::ENDURANCE_HOVER)
            .input::<Time>(names::ENDURANCE_REQUIRED)
            .compute(|inputs| {
                let endurance = inputs.scalar(0)?;
                let required = inputs.scalar(1)?;
                Ok((endurance - required) / required)
            }),
    ]
}
