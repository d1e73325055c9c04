//! Pong Wars headless runner
//!
//! Configures a session, starts the opening timer and drives the simulation
//! from a simulated 60 Hz frame clock, logging the score as tiles change
//! hands.
//!
//! Usage: `pong-wars [settings.json] [seconds]`

use std::process::ExitCode;

use pong_wars::Settings;
use pong_wars::consts::*;
use pong_wars::sim::{GameEvent, GameState, TickInput, tick};

/// Host frame interval
const FRAME_DT: f32 = 1.0 / 60.0;
/// Simulated seconds when none are given
const DEFAULT_SECONDS: f32 = 30.0;

/// Runner holding the session and the frame accumulator
struct Game {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    flips: u64,
}

impl Game {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            input: TickInput::default(),
            flips: 0,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.state.drain_events() {
            match event {
                GameEvent::TileFlipped(flip) => {
                    self.flips += 1;
                    log::trace!("flip {:?}", flip);
                }
                GameEvent::ScoreChanged(score) => {
                    log::debug!("Light {} - Dark {}", score.light, score.dark);
                }
                GameEvent::Launched => log::info!("Balls launched"),
                other => log::debug!("{:?}", other),
            }
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    let seconds = match args.next() {
        Some(s) => s.parse::<f32>()?,
        None => DEFAULT_SECONDS,
    };

    let mut state = GameState::from_settings(&settings)?;
    state.start(settings.launch_delay_secs);

    let mut game = Game::new(state);
    let frames = (seconds / FRAME_DT).ceil() as u64;
    for frame in 0..frames {
        game.update(FRAME_DT);
        if frame % 300 == 299 {
            let score = game.state.current_score();
            log::info!(
                "t={:.0}s  Light {}  Dark {}",
                (frame + 1) as f32 * FRAME_DT,
                score.light,
                score.dark
            );
        }
    }

    let score = game.state.current_score();
    log::info!(
        "Final after {seconds}s: Light {} - Dark {} ({} flips)",
        score.light,
        score.dark,
        game.flips
    );
    Ok(())
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pong Wars starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
