//! Integration tests for the AppService → controllers → outputs pipeline.
//!
//! These run on the host (x86_64) and drive the full tick loop against
//! [`MockHardware`], advancing its clock in 100 ms steps the way the
//! firmware main loop would.

use biocontrol::app::commands::AppCommand;
use biocontrol::app::events::{AppEvent, OverrideGroup};
use biocontrol::app::service::AppService;
use biocontrol::config::SystemConfig;
use biocontrol::context::{Actuator, ActuatorIntent, ClimateAssist, FloatSwitches};
use biocontrol::control::{EnvState, PumpPhase, PumpStage};
use biocontrol::error::SensorError;

use crate::mock_hw::{MockHardware, RecordingSink};

const STEP_MS: u64 = 100;
const MINUTE: u64 = 60 * 1000;

/// Build, start and run the boot self test to completion.
fn boot(config: SystemConfig) -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(config).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    while !app.self_test_done() {
        app.tick(&mut hw, &mut sink);
        hw.now_ms += STEP_MS;
    }
    (app, hw, sink)
}

/// Tick every [`STEP_MS`] up to and including `until_ms`.
fn run_until(app: &mut AppService, hw: &mut MockHardware, sink: &mut RecordingSink, until_ms: u64) {
    while hw.now_ms <= until_ms {
        app.tick(hw, sink);
        hw.now_ms += STEP_MS;
    }
}

fn only(actuator: Actuator) -> ActuatorIntent {
    let mut intent = ActuatorIntent::all_off();
    intent.set(actuator, true);
    intent
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_walks_every_relay_then_both_colours() {
    let (app, hw, sink) = boot(SystemConfig::default());

    for actuator in Actuator::ALL {
        assert!(
            hw.applied.contains(&only(actuator)),
            "{} was never pulsed alone",
            actuator.name()
        );
    }
    assert!(hw.applied.iter().any(|i| i.leds.red.iter().all(|b| *b) && !i.leds.blue.iter().any(|b| *b)));
    assert!(hw.applied.iter().any(|i| i.leds.blue.iter().all(|b| *b) && !i.leds.red.iter().any(|b| *b)));

    assert_eq!(hw.applied.first(), Some(&ActuatorIntent::all_off()));
    assert_eq!(hw.last(), ActuatorIntent::all_off());
    assert_eq!(sink.events.first(), Some(&AppEvent::Started { tasks: app.task_count() }));
    assert!(sink.contains(&AppEvent::SelfTestComplete));
    assert!(hw.clears >= 2);
}

#[test]
fn every_tick_flushes_once() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    let before = hw.applied.len();
    run_until(&mut app, &mut hw, &mut sink, 10_000);
    let ticks = app.tick_count() as usize;
    // One flush from start() plus one per tick.
    assert_eq!(hw.applied.len(), ticks + 1);
    assert!(hw.applied.len() > before);
}

// ── Display ───────────────────────────────────────────────────

#[test]
fn status_rows_show_climate_and_pump_countdown() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    run_until(&mut app, &mut hw, &mut sink, 2500);

    assert_eq!(hw.rows[0], "Hum:70% Temp:25C");
    assert!(hw.rows[1].starts_with("Pump "), "row 1 was {:?}", hw.rows[1]);
    assert!(hw.rows[1].trim_end().ends_with("min"));
}

#[test]
fn alert_replaces_countdown_and_scrolls() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    app.handle_command(AppCommand::alert("Irrigation valve stuck open"), &mut sink);
    run_until(&mut app, &mut hw, &mut sink, 2000);
    assert_eq!(hw.rows[1], "Irrigation valve");

    run_until(&mut app, &mut hw, &mut sink, 2500);
    assert_eq!(hw.rows[1], "rrigation valve ");

    app.handle_command(AppCommand::ClearAlert, &mut sink);
    run_until(&mut app, &mut hw, &mut sink, 3000);
    assert!(hw.rows[1].starts_with("Pump "));
    assert!(sink.contains(&AppEvent::AlertChanged(None)));
}

// ── Sensors ───────────────────────────────────────────────────

#[test]
fn failed_climate_read_keeps_previous_values() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    hw.set_climate(27, 60);
    run_until(&mut app, &mut hw, &mut sink, 2000);
    assert_eq!(app.context().readings.temperature_c, 27);

    hw.climate = Err(SensorError::Checksum);
    run_until(&mut app, &mut hw, &mut sink, 4000);
    assert_eq!(app.context().readings.temperature_c, 27);
    assert_eq!(app.context().readings.humidity_pct, 60);
    assert!(sink.contains(&AppEvent::SensorReadFailed));
}

#[test]
fn external_humidity_is_picked_up_by_sensor_task() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    hw.external_humidity = Some(41);
    run_until(&mut app, &mut hw, &mut sink, 2000);
    assert_eq!(app.context().readings.external_humidity_pct, 41);

    // Nothing new published: the last value stands.
    run_until(&mut app, &mut hw, &mut sink, 4000);
    assert_eq!(app.context().readings.external_humidity_pct, 41);
}

// ── Environment ───────────────────────────────────────────────

#[test]
fn hot_enclosure_starts_exhaust() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    hw.set_climate(35, 50);
    run_until(&mut app, &mut hw, &mut sink, MINUTE);

    assert!(hw.is_on(Actuator::Exhaust));
    assert_eq!(app.environment_state(), EnvState::ExhaustActive);
    assert!(sink.contains(&AppEvent::EnvironmentChanged {
        from: EnvState::Idle,
        to: EnvState::ExhaustActive,
    }));
}

#[test]
fn exhaust_escalates_to_cooling_when_still_hot() {
    let config = SystemConfig {
        exhaust_timeout_ms: 2 * MINUTE,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = boot(config);
    hw.set_climate(35, 50);
    run_until(&mut app, &mut hw, &mut sink, 4 * MINUTE);

    assert_eq!(app.environment_state(), EnvState::EscalatedCool);
    assert!(!hw.is_on(Actuator::Exhaust));
    assert_eq!(hw.last().climate.assist, ClimateAssist::Cool { setpoint_c: 22 });

    // Back in the ideal band: everything off.
    hw.set_climate(25, 50);
    run_until(&mut app, &mut hw, &mut sink, 5 * MINUTE);
    assert_eq!(app.environment_state(), EnvState::Idle);
    assert!(!hw.last().climate.is_on());
}

#[test]
fn exhaust_override_holds_manual_state() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    app.handle_command(AppCommand::ExhaustAuto(false), &mut sink);
    app.handle_command(AppCommand::Exhaust(true), &mut sink);
    assert!(sink.contains(&AppEvent::OverrideChanged {
        group: OverrideGroup::Exhaust,
        manual: true,
    }));

    // Ideal band would normally switch the exhaust off.
    run_until(&mut app, &mut hw, &mut sink, MINUTE);
    assert!(hw.is_on(Actuator::Exhaust));

    app.handle_command(AppCommand::ExhaustAuto(true), &mut sink);
    run_until(&mut app, &mut hw, &mut sink, 2 * MINUTE);
    assert!(!hw.is_on(Actuator::Exhaust));
}

// ── Pump ──────────────────────────────────────────────────────

#[test]
fn pump_runs_one_interval_every_three() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());

    run_until(&mut app, &mut hw, &mut sink, 2 * MINUTE);
    assert!(!hw.is_on(Actuator::Pump1));

    run_until(&mut app, &mut hw, &mut sink, 3 * MINUTE);
    assert!(hw.is_on(Actuator::Pump1));
    assert!(!hw.is_on(Actuator::Pump2));

    run_until(&mut app, &mut hw, &mut sink, 4 * MINUTE);
    assert!(!hw.is_on(Actuator::Pump1));

    let phases: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PumpPhase(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert_eq!(phases, [PumpPhase::Started, PumpPhase::Stopped]);
}

#[test]
fn pump_command_drives_pump_one_only() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    app.handle_command(AppCommand::Pump(true), &mut sink);
    app.tick(&mut hw, &mut sink);
    assert!(hw.is_on(Actuator::Pump1));
    assert!(!hw.is_on(Actuator::Pump2));
}

#[test]
fn pump_override_is_never_touched_by_automation() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    app.handle_command(AppCommand::PumpAuto(false), &mut sink);
    app.handle_command(AppCommand::Pump(false), &mut sink);
    let from = hw.applied.len();

    run_until(&mut app, &mut hw, &mut sink, 10 * MINUTE);
    assert!(hw.applied[from..].iter().all(|i| !i.pump_running()));
    assert!(!sink.events.iter().any(|e| matches!(e, AppEvent::PumpPhase(_))));
}

#[test]
fn failover_moves_to_second_pump_then_dry_tank() {
    let config = SystemConfig {
        pump_failover: true,
        ..SystemConfig::default()
    };
    // Settle time plus one flow-check period, plus one loop step of slack.
    let stage_ms = config.flow_settle_ms + config.flow_check_interval_ms + STEP_MS;
    let (mut app, mut hw, mut sink) = boot(config);
    hw.flow = false;

    while !hw.is_on(Actuator::Pump1) && hw.now_ms <= 4 * MINUTE {
        app.tick(&mut hw, &mut sink);
        hw.now_ms += STEP_MS;
    }
    assert!(hw.is_on(Actuator::Pump1), "pump 1 never started");
    let started = hw.now_ms;

    run_until(&mut app, &mut hw, &mut sink, started + stage_ms);
    assert!(!hw.is_on(Actuator::Pump1));
    assert!(hw.is_on(Actuator::Pump2));
    assert!(sink.contains(&AppEvent::PumpFailover(PumpStage::Secondary)));

    run_until(&mut app, &mut hw, &mut sink, started + 2 * stage_ms);
    assert!(!hw.last().pump_running());
    assert!(sink.contains(&AppEvent::PumpFailover(PumpStage::DryTank)));
}

#[test]
fn failover_stays_on_first_pump_with_flow() {
    let config = SystemConfig {
        pump_failover: true,
        ..SystemConfig::default()
    };
    let (mut app, mut hw, mut sink) = boot(config);
    run_until(&mut app, &mut hw, &mut sink, 3 * MINUTE + 30_000);
    assert!(hw.is_on(Actuator::Pump1));
    assert!(!sink.events.iter().any(|e| matches!(e, AppEvent::PumpFailover(_))));
}

// ── Lighting / irrigation / tank ──────────────────────────────

#[test]
fn lighting_follows_wall_clock_hour() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    hw.hour = Some(10);
    run_until(&mut app, &mut hw, &mut sink, 3 * MINUTE);
    assert!(hw.is_on(Actuator::LightContactor));
    assert!(hw.is_on(Actuator::Spotlight));
    assert!(hw.last().leds.red.iter().chain(hw.last().leds.blue.iter()).all(|b| *b));

    hw.hour = Some(22);
    run_until(&mut app, &mut hw, &mut sink, 6 * MINUTE);
    assert!(!hw.is_on(Actuator::LightContactor));
    assert!(!hw.last().leds.any_on());
}

#[test]
fn unknown_hour_leaves_lighting_alone() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    app.handle_command(AppCommand::Lighting(true), &mut sink);
    run_until(&mut app, &mut hw, &mut sink, 3 * MINUTE);
    assert!(hw.is_on(Actuator::LightContactor));
    assert!(hw.last().leds.any_on());
}

#[test]
fn lighting_override_ignores_schedule() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    app.handle_command(AppCommand::LightingAuto(false), &mut sink);
    hw.hour = Some(12);
    run_until(&mut app, &mut hw, &mut sink, 3 * MINUTE);
    assert!(!hw.is_on(Actuator::LightContactor));
    assert!(app.context().overrides.lighting);
}

#[test]
fn irrigation_valve_opens_every_second_interval() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    run_until(&mut app, &mut hw, &mut sink, MINUTE);
    assert!(!hw.is_on(Actuator::IrrigationValve));
    run_until(&mut app, &mut hw, &mut sink, 2 * MINUTE);
    assert!(hw.is_on(Actuator::IrrigationValve));
    run_until(&mut app, &mut hw, &mut sink, 3 * MINUTE);
    assert!(!hw.is_on(Actuator::IrrigationValve));
}

#[test]
fn tank_valve_fills_between_floats() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    hw.floats = FloatSwitches { high: false, low: false };
    run_until(&mut app, &mut hw, &mut sink, 5000);
    assert!(hw.is_on(Actuator::TankValve));

    hw.floats = FloatSwitches { high: false, low: true };
    run_until(&mut app, &mut hw, &mut sink, 10_000);
    assert!(hw.is_on(Actuator::TankValve));

    hw.floats = FloatSwitches { high: true, low: true };
    run_until(&mut app, &mut hw, &mut sink, 15_000);
    assert!(!hw.is_on(Actuator::TankValve));
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn device_commands_map_to_outputs() {
    let (mut app, mut hw, mut sink) = boot(SystemConfig::default());
    for (name, on) in [("spotlight", true), ("lamp", true)] {
        let cmd = AppCommand::from_device(name, on).unwrap();
        app.handle_command(cmd, &mut sink);
    }
    app.tick(&mut hw, &mut sink);
    assert!(hw.is_on(Actuator::Spotlight));
    assert!(hw.is_on(Actuator::Lamp));
    assert!(AppCommand::from_device("sprinkler", true).is_none());
}
