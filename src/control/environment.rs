//! Temperature / humidity hysteresis controller.
//!
//! Drives the exhaust relay and the logical air-conditioner demand.
//!
//! ```text
//!  IDLE ──[T > max]──▶ EXHAUST_ACTIVE ──[timeout, still T > max]──▶ ESCALATED_COOL
//!   ▲  ▲                    │                                             │
//!   │  └─────[T in ideal band]─────────────────────────────────────────────┘
//!   │
//!   └──[T in ideal band]── HEAT_ASSIST ◀──[T < min]── any
//! ```
//!
//! Rules run every tick, temperature branch first, then humidity branch;
//! within a branch the later rule wins.  Both branches share one physical
//! exhaust channel: the relay is on while either branch demands it.  The
//! temperature rules that switch the exhaust off clear both demands, the
//! humidity clear rule only its own.

use log::{debug, info};

use super::timeout::Timeout;
use crate::config::SystemConfig;
use crate::context::{Actuator, ClimateAssist, ClimateIntent, ControlContext};

/// Logical controller state, derived from the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvState {
    Idle,
    ExhaustActive,
    HeatAssist,
    EscalatedCool,
}

pub struct EnvironmentController {
    /// Started whenever the exhaust is switched on by either branch.
    exhaust_timeout: Timeout,
    /// Exhaust demanded by the temperature branch.
    temp_exhaust: bool,
    /// Exhaust demanded by the humidity branch.
    humid_exhaust: bool,
    assist: ClimateAssist,
    dehumidify: bool,
    state: EnvState,
}

impl EnvironmentController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            exhaust_timeout: Timeout::new(config.exhaust_timeout_ms),
            temp_exhaust: false,
            humid_exhaust: false,
            assist: ClimateAssist::Off,
            dehumidify: false,
            state: EnvState::Idle,
        }
    }

    /// Evaluate every rule once and write the exhaust and climate intent.
    ///
    /// Does nothing while the exhaust group is overridden.  Returns
    /// `Some((from, to))` when the logical state changed.
    pub fn tick(&mut self, ctx: &mut ControlContext, now_ms: u64) -> Option<(EnvState, EnvState)> {
        if ctx.overrides.exhaust {
            debug!("ENV: exhaust overridden, holding outputs");
            return None;
        }

        self.temperature_rules(ctx, now_ms);
        self.humidity_rules(ctx, now_ms);

        ctx.intent.set(Actuator::Exhaust, self.exhaust_on());
        ctx.intent.climate = ClimateIntent {
            assist: self.assist,
            dehumidify: self.dehumidify,
        };

        let prev = self.state;
        self.state = self.derive_state();
        if prev == self.state {
            return None;
        }
        info!(
            "ENV: {:?} -> {:?} (T={}C H={}%)",
            prev, self.state, ctx.readings.temperature_c, ctx.readings.humidity_pct
        );
        Some((prev, self.state))
    }

    pub fn state(&self) -> EnvState {
        self.state
    }

    /// Physical exhaust demand.
    pub fn exhaust_on(&self) -> bool {
        self.temp_exhaust || self.humid_exhaust
    }

    pub fn assist(&self) -> ClimateAssist {
        self.assist
    }

    pub fn dehumidifying(&self) -> bool {
        self.dehumidify
    }

    pub fn exhaust_timeout(&self) -> &Timeout {
        &self.exhaust_timeout
    }

    // ── Temperature branch ────────────────────────────────────

    fn temperature_rules(&mut self, ctx: &ControlContext, now_ms: u64) {
        let c = &ctx.config;
        let t = ctx.readings.temperature_c;

        if t > c.temp_max_c {
            // Hot: try the exhaust first.
            if !self.exhaust_on() && self.assist == ClimateAssist::Off {
                self.temp_exhaust = true;
                self.exhaust_timeout.start(now_ms);
            }
        } else if t < c.temp_min_c {
            self.force_exhaust_off();
            self.assist = ClimateAssist::Heat {
                setpoint_c: c.ideal_high_c(),
            };
        }

        // Exhaust ran its full time and did not cool the space.
        if self.exhaust_timeout.has_expired(now_ms) && t > c.temp_max_c {
            self.force_exhaust_off();
            self.assist = ClimateAssist::Cool {
                setpoint_c: c.ideal_low_c(),
            };
        }

        if (c.ideal_low_c()..=c.ideal_high_c()).contains(&t) {
            self.force_exhaust_off();
            self.assist = ClimateAssist::Off;
        }
    }

    // ── Humidity branch ───────────────────────────────────────

    fn humidity_rules(&mut self, ctx: &ControlContext, now_ms: u64) {
        let c = &ctx.config;
        let r = &ctx.readings;
        let h = r.humidity_pct;

        if h > c.humidity_exhaust_pct && h < c.humidity_max_pct {
            // Venting only helps if outside is drier, dry, and we are not cold.
            if r.temperature_c > c.temp_min_c
                && !r.raining
                && r.external_humidity_pct < c.humidity_exhaust_pct
            {
                self.humid_exhaust = true;
                self.exhaust_timeout.start(now_ms);
            }
        } else if h >= c.humidity_max_pct {
            self.dehumidify = true;
        }

        if self.exhaust_timeout.has_expired(now_ms) || h <= c.humidity_clear_pct() {
            self.humid_exhaust = false;
            self.dehumidify = false;
        }
    }

    fn force_exhaust_off(&mut self) {
        self.temp_exhaust = false;
        self.humid_exhaust = false;
    }

    fn derive_state(&self) -> EnvState {
        match self.assist {
            ClimateAssist::Heat { .. } => EnvState::HeatAssist,
            ClimateAssist::Cool { .. } => EnvState::EscalatedCool,
            ClimateAssist::Off if self.exhaust_on() => EnvState::ExhaustActive,
            ClimateAssist::Off => EnvState::Idle,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_reading() -> impl Strategy<Value = (i16, u8, u8, bool)> {
        (
            0i16..50,   // temperature
            0u8..=100,  // humidity
            0u8..=100,  // external humidity
            any::<bool>(),
        )
    }

    proptest! {
        #[test]
        fn hot_start_always_switches_exhaust_on(t in 31i16..60, h in 0u8..=90) {
            let config = SystemConfig::default();
            let mut env = EnvironmentController::new(&config);
            let mut ctx = ControlContext::new(config);
            ctx.readings.temperature_c = t;
            ctx.readings.humidity_pct = h;

            env.tick(&mut ctx, 1000);
            prop_assert!(ctx.intent.get(Actuator::Exhaust));
            prop_assert_eq!(env.exhaust_timeout().elapsed_ms(1000), Some(0));
        }

        #[test]
        fn ideal_band_forces_exhaust_off(
            history in proptest::collection::vec(arb_reading(), 0..30),
            t in 22i16..=28,
            h in 0u8..=90,
        ) {
            let config = SystemConfig::default();
            let mut env = EnvironmentController::new(&config);
            let mut ctx = ControlContext::new(config);

            let mut now = 0;
            for (temp, hum, ext, rain) in history {
                ctx.readings.temperature_c = temp;
                ctx.readings.humidity_pct = hum;
                ctx.readings.external_humidity_pct = ext;
                ctx.readings.raining = rain;
                env.tick(&mut ctx, now);
                now += 60_000;
            }

            ctx.readings.temperature_c = t;
            ctx.readings.humidity_pct = h;
            env.tick(&mut ctx, now);
            prop_assert!(!ctx.intent.get(Actuator::Exhaust));
            prop_assert_eq!(ctx.intent.climate.assist, ClimateAssist::Off);
        }
    }
}
