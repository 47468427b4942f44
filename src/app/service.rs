//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the shared context, every controller, the display
//! renderer and the task scheduler.  It exposes a clean, hardware-agnostic
//! API.  All I/O flows through port traits injected at call sites, making
//! the entire service testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!     TimePort ──▶ │          AppService          │
//! ActuatorPort ◀── │ Scheduler · Controllers · UI │ ──▶ DisplayPort
//!                  └──────────────────────────────┘
//! ```
//!
//! Every [`tick`](AppService::tick) ends with exactly one flush of the
//! actuator intent, whether or not any task ran.

use log::{debug, info};

use crate::config::SystemConfig;
use crate::context::{Actuator, ControlContext};
use crate::control::{
    EnvState, EnvironmentController, IrrigationController, LightingController,
    PumpCycleController, SelfTest, TankLevelController,
};
use crate::display::{self, DisplayRenderer};
use crate::error::{Error, Result};
use crate::scheduler::TaskRunner;

use super::commands::AppCommand;
use super::events::{AppEvent, OverrideGroup};
use super::ports::{EventSink, Hardware};
use super::tasks::{self, Task, TaskScheduler};

const STATUS_ROW: usize = 0;
const ALERT_ROW: usize = 1;

// ───────────────────────────────────────────────────────────────
// Control core
// ───────────────────────────────────────────────────────────────

/// State touched by task bodies.  Split from the scheduler so the
/// scheduler can borrow it mutably while iterating its own table.
struct ControlCore {
    ctx: ControlContext,
    environment: EnvironmentController,
    pump: PumpCycleController,
    irrigation: IrrigationController,
    lighting: LightingController,
    tank: TankLevelController,
    renderer: DisplayRenderer,
}

/// Runs one task body against the core and the injected ports.
struct Dispatch<'a, H, S> {
    core: &'a mut ControlCore,
    hw: &'a mut H,
    sink: &'a mut S,
}

impl<H: Hardware, S: EventSink> TaskRunner<Task> for Dispatch<'_, H, S> {
    fn run_task(&mut self, task: &Task, now_ms: u64) {
        let core = &mut *self.core;
        match task {
            Task::ReadSensors => self.read_sensors(),
            Task::PumpCycle => {
                if let Some(phase) = core.pump.tick(&mut core.ctx, now_ms) {
                    self.sink.emit(&AppEvent::PumpPhase(phase));
                }
            }
            Task::FlowCheck => {
                if let Some(stage) = core.pump.check_flow(&mut core.ctx, now_ms) {
                    self.sink.emit(&AppEvent::PumpFailover(stage));
                }
            }
            Task::Irrigation => {
                core.irrigation.tick(&mut core.ctx);
            }
            Task::Environment => {
                if let Some((from, to)) = core.environment.tick(&mut core.ctx, now_ms) {
                    self.sink.emit(&AppEvent::EnvironmentChanged { from, to });
                }
            }
            Task::Lighting => {
                core.lighting.tick(&mut core.ctx, self.hw.current_hour());
            }
            Task::TankLevel => {
                core.tank.tick(&mut core.ctx);
            }
            Task::Display => self.render(now_ms),
        }
    }
}

impl<H: Hardware, S: EventSink> Dispatch<'_, H, S> {
    fn read_sensors(&mut self) {
        let readings = &mut self.core.ctx.readings;
        match self.hw.read_climate() {
            Ok(sample) => {
                readings.temperature_c = sample.temperature_c;
                readings.humidity_pct = sample.humidity_pct;
            }
            Err(e) => {
                debug!("SENSORS: climate read failed ({}), keeping last values", e);
                self.sink.emit(&AppEvent::SensorReadFailed);
            }
        }
        readings.flow_detected = self.hw.read_flow();
        readings.floats = self.hw.read_float_switches();
        readings.raining = self.hw.read_rain();
        if let Some(h) = self.hw.poll_external_humidity() {
            readings.external_humidity_pct = h;
        }
    }

    fn render(&mut self, now_ms: u64) {
        let core = &mut *self.core;
        let r = &core.ctx.readings;
        core.renderer
            .set_scroll(STATUS_ROW, &display::climate_line(r.humidity_pct, r.temperature_c));

        match &core.ctx.alert {
            Some(alert) => core.renderer.set_scroll(ALERT_ROW, alert),
            None => {
                let remaining = core.pump.countdown_ms(
                    now_ms,
                    core.ctx.intent.pump_running(),
                    &core.ctx.config,
                );
                core.renderer
                    .set_scroll(ALERT_ROW, &display::pump_countdown_line(remaining));
            }
        }

        core.renderer.advance(&mut *self.hw, STATUS_ROW);
        core.renderer.advance(&mut *self.hw, ALERT_ROW);
    }
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all control logic.
pub struct AppService {
    scheduler: TaskScheduler,
    core: ControlCore,
    self_test: SelfTest,
    tick_count: u64,
}

impl AppService {
    /// Validate `config` and build the task table.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;

        let mut scheduler = TaskScheduler::new();
        tasks::register_all(&mut scheduler, &config)
            .map_err(|_| Error::Init("task table exceeds scheduler capacity"))?;

        let self_test = SelfTest::new(config.self_test_step_ms);
        let core = ControlCore {
            environment: EnvironmentController::new(&config),
            pump: PumpCycleController::new(),
            irrigation: IrrigationController::new(),
            lighting: LightingController::new(),
            tank: TankLevelController::new(),
            renderer: DisplayRenderer::new(),
            ctx: ControlContext::new(config),
        };

        Ok(Self {
            scheduler,
            core,
            self_test,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Switch every output off and show the boot banner.  The actuator
    /// walk runs over the following ticks.
    pub fn start(&mut self, hw: &mut impl Hardware, sink: &mut impl EventSink) {
        self.core.ctx.intent = crate::context::ActuatorIntent::all_off();
        hw.apply(&self.core.ctx.intent);
        hw.clear();
        self.core.renderer.draw(hw, STATUS_ROW, 0, "Self test");

        sink.emit(&AppEvent::Started {
            tasks: self.scheduler.len(),
        });
        info!("AppService started with {} tasks", self.scheduler.len());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One main-loop iteration: advance the self test or run every due
    /// task, then flush the intent to the outputs.
    pub fn tick(&mut self, hw: &mut impl Hardware, sink: &mut impl EventSink) {
        self.tick_count += 1;
        let now_ms = hw.uptime_ms();

        if self.self_test.is_done() {
            let mut dispatch = Dispatch {
                core: &mut self.core,
                hw: &mut *hw,
                sink: &mut *sink,
            };
            self.scheduler.tick(now_ms, &mut dispatch);
        } else if self.self_test.tick(now_ms, &mut self.core.ctx.intent) {
            hw.clear();
            sink.emit(&AppEvent::SelfTestComplete);
        }

        hw.apply(&self.core.ctx.intent);
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an external command.  Outputs change at the next flush.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        let ctx = &mut self.core.ctx;
        debug!("CMD: {:?}", cmd);
        match cmd {
            AppCommand::Pump(on) => {
                ctx.intent.set(Actuator::Pump1, on);
                ctx.intent.set(Actuator::Pump2, false);
            }
            AppCommand::Exhaust(on) => ctx.intent.set(Actuator::Exhaust, on),
            AppCommand::Lighting(on) => {
                ctx.intent.leds.set_all(on, on);
                ctx.intent.set(Actuator::LightContactor, on);
            }
            AppCommand::Spotlight(on) => ctx.intent.set(Actuator::Spotlight, on),
            AppCommand::Lamp(on) => ctx.intent.set(Actuator::Lamp, on),

            AppCommand::PumpAuto(auto) => {
                ctx.overrides.pump = !auto;
                Self::emit_override(sink, OverrideGroup::Pump, !auto);
            }
            AppCommand::ExhaustAuto(auto) => {
                ctx.overrides.exhaust = !auto;
                Self::emit_override(sink, OverrideGroup::Exhaust, !auto);
            }
            AppCommand::LightingAuto(auto) => {
                ctx.overrides.lighting = !auto;
                Self::emit_override(sink, OverrideGroup::Lighting, !auto);
            }

            AppCommand::SetAlert(text) => {
                ctx.alert = Some(text.clone());
                sink.emit(&AppEvent::AlertChanged(Some(text)));
            }
            AppCommand::ClearAlert => {
                if ctx.alert.take().is_some() {
                    sink.emit(&AppEvent::AlertChanged(None));
                }
            }
        }
    }

    fn emit_override(sink: &mut impl EventSink, group: OverrideGroup, manual: bool) {
        info!("CMD: {:?} {}", group, if manual { "manual" } else { "automatic" });
        sink.emit(&AppEvent::OverrideChanged { group, manual });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn context(&self) -> &ControlContext {
        &self.core.ctx
    }

    pub fn environment_state(&self) -> EnvState {
        self.core.environment.state()
    }

    pub fn pump(&self) -> &PumpCycleController {
        &self.core.pump
    }

    pub fn self_test_done(&self) -> bool {
        self.self_test.is_done()
    }

    /// Number of registered periodic tasks.
    pub fn task_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Main-loop iterations since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
