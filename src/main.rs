//! Broadside entry point
//!
//! Headless runner: drives the simulation with a fixed-step accumulator at a
//! simulated 60 fps and logs what a frontend would draw.
//!
//! ```text
//! broadside [TUNING.json] [--seed N] [--seconds S] [--no-autoplay]
//! ```

use std::process::ExitCode;

use glam::DVec2;

use broadside::Tuning;
use broadside::consts::*;
use broadside::sim::{
    BoatMuzzle, GameEvent, GameSink, GameState, MuzzleProvider, Outcome, ShotKind, Star,
    TickInput, dispatch, tick,
};

/// Frame time of the simulated display
const FRAME_DT: f64 = 1.0 / 60.0;

struct Options {
    tuning_path: Option<String>,
    seed: u64,
    seconds: f64,
    autoplay: bool,
}

impl Options {
    fn parse() -> Result<Self, String> {
        let mut options = Options {
            tuning_path: None,
            seed: 0x5eed,
            seconds: 60.0,
            autoplay: true,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    options.seed = value.parse().map_err(|_| format!("bad seed: {}", value))?;
                }
                "--seconds" => {
                    let value = args.next().ok_or("--seconds needs a value")?;
                    options.seconds =
                        value.parse().map_err(|_| format!("bad duration: {}", value))?;
                }
                "--no-autoplay" => options.autoplay = false,
                path if !path.starts_with("--") => options.tuning_path = Some(path.to_string()),
                other => return Err(format!("unknown option: {}", other)),
            }
        }
        Ok(options)
    }
}

/// Stands in for the renderer/HUD: tallies and logs what it is told
#[derive(Default)]
struct LogSink {
    shots: u32,
    hazards: u32,
    impacts: u32,
    lives_lost: u32,
    perfect: u32,
    good: u32,
    wasted: u32,
}

impl GameSink for LogSink {
    fn on_shot_fired(&mut self, kind: ShotKind, impact: DVec2, flight_duration: f64) {
        self.shots += 1;
        if kind.is_hazard() {
            self.hazards += 1;
        }
        log::trace!(
            "{} toward ({:.0}, {:.0}), lands in {:.2}s",
            kind.as_str(),
            impact.x,
            impact.y,
            flight_duration
        );
    }

    fn on_impact(&mut self, _id: u32, _position: DVec2) {
        self.impacts += 1;
    }

    fn on_life_delta(&mut self, amount: i32) {
        self.lives_lost += amount.unsigned_abs();
    }

    fn on_outcome(&mut self, outcome: Outcome, position: DVec2, points: i32) {
        match outcome {
            Outcome::Perfect => self.perfect += 1,
            Outcome::Good => self.good += 1,
            Outcome::TooEarlyOrLate => self.wasted += 1,
            _ => {}
        }
        if outcome.is_bad() {
            log::info!("{} at ({:.0}, {:.0})", outcome.tag(), position.x, position.y);
        } else {
            log::debug!("{} +{}", outcome.tag(), points);
        }
    }

    fn on_star(&mut self, star: Star) {
        log::info!("{:?} star!", star);
    }

    fn on_game_over(&mut self, score: u64) {
        log::info!("Final score: {}", score);
    }
}

/// Game instance holding all state
struct Game {
    state: GameState,
    muzzle: BoatMuzzle,
    accumulator: f64,
    input: TickInput,
    sink: LogSink,
}

impl Game {
    fn new(seed: u64, tuning: Tuning, autoplay: bool) -> Result<Self, broadside::ConfigError> {
        // Boat sits centred, low on the screen
        let anchor = DVec2::new(tuning.screen_size.x * 0.5, tuning.screen_size.y * 0.12);
        let state = GameState::new(seed, tuning)?;
        Ok(Self {
            state,
            muzzle: BoatMuzzle::at_anchor(anchor),
            accumulator: 0.0,
            input: TickInput {
                autoplay,
                ..Default::default()
            },
            sink: LogSink::default(),
        })
    }

    /// Run simulation ticks for one display frame
    fn update(&mut self, dt: f64) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input.muzzle = self.muzzle.muzzle_at(self.state.time);
            tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.taps.clear();
            self.input.pause = false;
            self.input.fire_now = false;
        }

        let events: Vec<GameEvent> = self.state.drain_events();
        dispatch(&events, &mut self.sink);
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let options = match Options::parse() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };

    let tuning = match &options.tuning_path {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    let mut game = match Game::new(options.seed, tuning, options.autoplay) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Invalid tuning: {}", err);
            return ExitCode::FAILURE;
        }
    };

    log::info!("Broadside (native) starting...");
    let frames = (options.seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        game.update(FRAME_DT);
        if game.state.is_over() {
            break;
        }
    }

    let sink = &game.sink;
    println!(
        "t={:.1}s score={} lives={} progress={:.0}%",
        game.state.time,
        game.state.score,
        game.state.lives,
        game.state.progress() * 100.0
    );
    println!(
        "shots={} (tnt {}) impacts={} perfect={} good={} wasted={} lives lost={}",
        sink.shots,
        sink.hazards,
        sink.impacts,
        sink.perfect,
        sink.good,
        sink.wasted,
        sink.lives_lost
    );
    ExitCode::SUCCESS
}
