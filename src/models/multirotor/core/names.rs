//! Quantity names used by the multirotor blocks.
//!
//! Names are colon-separated paths. `optimization:variables:*` are the design
//! variables, `optimization:constraints:*` the normalized constraints,
//! `specifications:*` the mission requirements and `data:*` everything the
//! blocks compute.

pub const BATTERY_MASS_RATIO: &str = "optimization:variables:battery:mass_ratio";
pub const PROPELLER_DIAMETER: &str = "optimization:variables:propeller:diameter";
pub const MOTOR_TORQUE_RATIO: &str = "optimization:variables:motor:torque_ratio";
pub const MOTOR_SPEED_RATIO: &str = "optimization:variables:motor:speed_ratio";
pub const BATTERY_VOLTAGE_RATIO: &str = "optimization:variables:battery:voltage_ratio";

pub const PAYLOAD: &str = "specifications:payload:mass";
pub const MTOW_MAX: &str = "specifications:mtow:max";
pub const ENDURANCE_REQUIRED: &str = "specifications:endurance:hover";

pub const ARMS: &str = "data:structure:arms";
pub const GRAVITY: &str = "data:environment:gravity";
pub const AIR_DENSITY: &str = "data:environment:air_density";
pub const TAKEOFF_THRUST_RATIO: &str = "data:scenario:thrust:takeoff_ratio";
pub const THRUST_COEFFICIENT: &str = "data:propeller:thrust_coefficient";
pub const POWER_COEFFICIENT: &str = "data:propeller:power_coefficient";
pub const DISCHARGE_DEPTH: &str = "data:battery:discharge_depth";
pub const ESC_EFFICIENCY: &str = "data:esc:efficiency";
pub const FRAME_MASS_RATIO: &str = "data:structure:mass_ratio";
pub const MTOW_GUESS_RATIO: &str = "data:weight:mtow:guess_ratio";

pub const MTOW: &str = "data:weight:mtow";
pub const THRUST_HOVER: &str = "data:scenario:thrust:hover";
pub const THRUST_TAKEOFF: &str = "data:scenario:thrust:takeoff";

pub const PROPELLER_MASS: &str = "data:propeller:mass";
pub const PROPELLER_SPEED_HOVER: &str = "data:propeller:speed:hover";
pub const PROPELLER_SPEED_TAKEOFF: &str = "data:propeller:speed:takeoff";
pub const PROPELLER_TORQUE_HOVER: &str = "data:propeller:torque:hover";
pub const PROPELLER_TORQUE_TAKEOFF: &str = "data:propeller:torque:takeoff";
pub const PROPELLER_POWER_HOVER: &str = "data:propeller:power:hover";
pub const PROPELLER_POWER_TAKEOFF: &str = "data:propeller:power:takeoff";

pub const MOTOR_TORQUE_NOMINAL: &str = "data:motor:torque:nominal";
pub const MOTOR_TORQUE_MAX: &str = "data:motor:torque:max";
pub const MOTOR_MASS: &str = "data:motor:mass";
pub const MOTOR_TORQUE_CONSTANT: &str = "data:motor:torque_constant";
pub const MOTOR_RESISTANCE: &str = "data:motor:resistance";
pub const MOTOR_FRICTION_TORQUE: &str = "data:motor:torque:friction";
pub const MOTOR_CURRENT_HOVER: &str = "data:motor:current:hover";
pub const MOTOR_CURRENT_TAKEOFF: &str = "data:motor:current:takeoff";
pub const MOTOR_VOLTAGE_HOVER: &str = "data:motor:voltage:hover";
pub const MOTOR_VOLTAGE_TAKEOFF: &str = "data:motor:voltage:takeoff";
pub const MOTOR_POWER_HOVER: &str = "data:motor:power:hover";
pub const MOTOR_POWER_TAKEOFF: &str = "data:motor:power:takeoff";

pub const ESC_MASS: &str = "data:esc:mass";
pub const STRUCTURE_MASS: &str = "data:structure:mass";

pub const BATTERY_MASS: &str = "data:battery:mass";
pub const BATTERY_OPEN_CIRCUIT_VOLTAGE: &str = "data:battery:voltage:open_circuit";
pub const BATTERY_RESISTANCE: &str = "data:battery:resistance";
pub const BATTERY_VOLTAGE: &str = "data:battery:voltage:terminal";
pub const BATTERY_CURRENT_HOVER: &str = "data:battery:current:hover";
pub const BATTERY_CURRENT_TAKEOFF: &str = "data:battery:current:takeoff";
pub const BATTERY_CAPACITY: &str = "data:battery:capacity";
pub const BATTERY_CURRENT_MAX: &str = "data:battery:current:max";
pub const ENDURANCE_HOVER: &str = "data:mission:endurance:hover";

pub const MTOW_CONSTRAINT: &str = "optimization:constraints:mtow";
pub const MOTOR_TORQUE_CONSTRAINT: &str = "optimization:constraints:motor:torque";
pub const BATTERY_VOLTAGE_CONSTRAINT: &str = "optimization:constraints:battery:voltage";
pub const BATTERY_CURRENT_CONSTRAINT: &str = "optimization:constraints:battery:current";
pub const ENDURANCE_CONSTRAINT: &str = "optimization:constraints:endurance:hover";
