use uom::si::{f64::Length, length::meter};

use crate::{
    mda::{BuildError, DesignPoint, Parameter, Registry},
    support::bound::Interval,
};

use super::names;

const BATTERY_MASS_RATIO_BOUNDS: Interval = Interval::new_unchecked(0.1, 10.0);
/// Meters.
const PROPELLER_DIAMETER_BOUNDS: Interval = Interval::new_unchecked(0.05, 1.0);
const OVERSIZING_BOUNDS: Interval = Interval::new_unchecked(1.0, 10.0);
const BATTERY_VOLTAGE_RATIO_BOUNDS: Interval = Interval::new_unchecked(1.0, 5.0);

/// The design variables of a multirotor sizing.
///
/// The ratios are the usual sizing "oversizing coefficients": each scales
/// one component relative to the load it has to carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultirotorDesign {
    /// Battery mass over payload mass.
    pub battery_mass_ratio: f64,
    pub propeller_diameter: Length,
    /// Motor nominal torque over hover torque.
    pub motor_torque_ratio: f64,
    /// Motor no-load speed over takeoff speed.
    pub motor_speed_ratio: f64,
    /// Battery voltage over the voltage estimated from takeoff power.
    pub battery_voltage_ratio: f64,
}

impl Default for MultirotorDesign {
    fn default() -> Self {
        Self {
            battery_mass_ratio: 0.5,
            propeller_diameter: Length::new::<meter>(0.35),
            motor_torque_ratio: 2.0,
            motor_speed_ratio: 1.4,
            battery_voltage_ratio: 1.4,
        }
    }
}

impl MultirotorDesign {
    /// The design point an engine run expects, in SI units.
    #[must_use]
    pub fn to_point(&self) -> DesignPoint {
        DesignPoint::from([
            (names::BATTERY_MASS_RATIO.to_owned(), self.battery_mass_ratio),
            (
                names::PROPELLER_DIAMETER.to_owned(),
                self.propeller_diameter.get::<meter>(),
            ),
            (names::MOTOR_TORQUE_RATIO.to_owned(), self.motor_torque_ratio),
            (names::MOTOR_SPEED_RATIO.to_owned(), self.motor_speed_ratio),
            (
                names::BATTERY_VOLTAGE_RATIO.to_owned(),
                self.battery_voltage_ratio,
            ),
        ])
    }

    /// Registers the design variables with their bounds, defaulting to `self`.
    pub(crate) fn register(&self, registry: &mut Registry) -> Result<(), BuildError> {
        let ratio = |name: &str, bounds: Interval, default: f64| {
            Parameter::design_variable::<f64>(name, bounds).with_default(default)
        };
        registry
            .parameter(ratio(
                names::BATTERY_MASS_RATIO,
                BATTERY_MASS_RATIO_BOUNDS,
                self.battery_mass_ratio,
            ))?
            .parameter(
                Parameter::design_variable::<Length>(
                    names::PROPELLER_DIAMETER,
                    PROPELLER_DIAMETER_BOUNDS,
                )
                .with_default(self.propeller_diameter.get::<meter>()),
            )?
            .parameter(ratio(
                names::MOTOR_TORQUE_RATIO,
                OVERSIZING_BOUNDS,
                self.motor_torque_ratio,
            ))?
            .parameter(ratio(
                names::MOTOR_SPEED_RATIO,
                OVERSIZING_BOUNDS,
                self.motor_speed_ratio,
            ))?
            .parameter(ratio(
                names::BATTERY_VOLTAGE_RATIO,
                BATTERY_VOLTAGE_RATIO_BOUNDS,
                self.battery_voltage_ratio,
            ))?;
        Ok(())
    }
}
