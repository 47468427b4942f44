//! Control policies.  Each controller reads the sensor snapshot in the
//! shared context and writes only its own slice of the actuator intent.

pub mod environment;
pub mod irrigation;
pub mod lighting;
pub mod pump_cycle;
pub mod tank_level;
pub mod timeout;

pub use environment::{EnvState, EnvironmentController};
pub use irrigation::IrrigationController;
pub use lighting::LightingController;
pub use pump_cycle::{PumpCycleController, PumpPhase, PumpStage};
pub use self_test::SelfTest;
pub use tank_level::TankLevelController;
pub use timeout::Timeout;
