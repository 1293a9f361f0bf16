use uom::si::{
    acceleration::meter_per_second_squared,
    f64::{Acceleration, Mass, MassDensity, Time},
    mass::kilogram,
    mass_density::kilogram_per_cubic_meter,
    time::minute,
};

use crate::mda::{BuildError, Parameter, Registry};

use super::names;

/// Mission requirements and environment data for a multirotor sizing.
///
/// Every field is registered as a constant, so a run may still override it
/// through the design point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultirotorSpec {
    pub payload: Mass,
    /// Upper limit on the maximum takeoff mass.
    pub max_takeoff_mass: Mass,
    /// Required hover time on one battery charge.
    pub hover_endurance: Time,
    pub arms: u32,
    pub gravity: Acceleration,
    pub air_density: MassDensity,
    /// Takeoff thrust over hover thrust.
    pub takeoff_thrust_ratio: f64,
    pub thrust_coefficient: f64,
    pub power_coefficient: f64,
    /// Fraction of the battery capacity usable in flight.
    pub discharge_depth: f64,
    pub esc_efficiency: f64,
    /// Structure mass per unit of total takeoff thrust mass.
    pub frame_mass_ratio: f64,
    /// First MTOW estimate as a multiple of the payload.
    pub mtow_guess_ratio: f64,
}

impl Default for MultirotorSpec {
    fn default() -> Self {
        Self {
            payload: Mass::new::<kilogram>(4.0),
            max_takeoff_mass: Mass::new::<kilogram>(10.0),
            hover_endurance: Time::new::<minute>(8.0),
            arms: 4,
            gravity: Acceleration::new::<meter_per_second_squared>(9.81),
            air_density: MassDensity::new::<kilogram_per_cubic_meter>(1.18),
            takeoff_thrust_ratio: 2.0,
            thrust_coefficient: 0.1,
            power_coefficient: 0.04,
            discharge_depth: 0.8,
            esc_efficiency: 0.95,
            frame_mass_ratio: 0.08,
            mtow_guess_ratio: 2.0,
        }
    }
}

impl MultirotorSpec {
    pub(crate) fn register(&self, registry: &mut Registry) -> Result<(), BuildError> {
        registry
            .parameter(Parameter::constant(names::PAYLOAD, self.payload))?
            .parameter(Parameter::constant(names::MTOW_MAX, self.max_takeoff_mass))?
            .parameter(Parameter::constant(
                names::ENDURANCE_REQUIRED,
                self.hover_endurance,
            ))?
            .parameter(Parameter::constant(names::ARMS, f64::from(self.arms)))?
            .parameter(Parameter::constant(names::GRAVITY, self.gravity))?
            .parameter(Parameter::constant(names::AIR_DENSITY, self.air_density))?
            .parameter(Parameter::constant(
                names::TAKEOFF_THRUST_RATIO,
                self.takeoff_thrust_ratio,
            ))?
            .parameter(Parameter::constant(
                names::THRUST_COEFFICIENT,
                self.thrust_coefficient,
            ))?
            .parameter(Parameter::constant(
                names::POWER_COEFFICIENT,
                self.power_coefficient,
            ))?
            .parameter(Parameter::constant(
                names::DISCHARGE_DEPTH,
                self.discharge_depth,
            ))?
            .parameter(Parameter::constant(names::ESC_EFFICIENCY, self.esc_efficiency))?
            .parameter(Parameter::constant(
                names::FRAME_MASS_RATIO,
                self.frame_mass_ratio,
            ))?
            .parameter(Parameter::constant(
                names::MTOW_GUESS_RATIO,
                self.mtow_guess_ratio,
            ))?;
        Ok(())
    }
}
