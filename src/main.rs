//! Sky Hop headless runner
//!
//! Plays an autopilot session without a window and reports the result.
//! Usage: `sky-hop [seed] [tuning.json]`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use sky_hop::sim::{GameEvent, GameState, TickInput, tick};
use sky_hop::{Tuning, TuningError, Viewport};

/// Simulated seconds per run
const RUN_SECONDS: f32 = 120.0;
/// Nominal frame time, jittered to mimic a real display loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Upper clamp on a single frame, like a render loop after a stall
const MAX_FRAME_DT: f32 = 0.1;

fn load_tuning(seed: Option<u64>, path: Option<&str>) -> Result<Tuning, TuningError> {
    let tuning = match path {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    Ok(match seed {
        Some(seed) => tuning.with_seed(seed),
        None => tuning,
    })
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = match args.first().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => Some(seed),
        Some(Err(e)) => {
            log::error!("Invalid seed {:?}: {}", args[0], e);
            std::process::exit(2);
        }
        None => None,
    };

    let tuning = match load_tuning(seed, args.get(1).map(String::as_str)) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let viewport = Viewport::default();
    let mut state = match GameState::new(tuning, viewport) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Sky Hop (headless) starting, seed {}, viewport {}x{}, landing {}, bounds {}",
        state.generator.seed(),
        viewport.width,
        viewport.height,
        state.tuning.physics.landing.as_str(),
        state.tuning.physics.horizontal_bounds.as_str()
    );

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut jitter = Pcg32::seed_from_u64(state.generator.seed() ^ 0xF00D);
    let mut elapsed = 0.0;
    let mut landings = 0u32;

    while elapsed < RUN_SECONDS {
        let dt = (FRAME_DT * jitter.random_range(0.5f32..1.5)).min(MAX_FRAME_DT);
        tick(&mut state, &input, viewport, dt);
        elapsed += dt;

        for event in state.drain_events() {
            match event {
                GameEvent::Landed { .. } | GameEvent::Bounced { .. } => landings += 1,
                GameEvent::SessionReset { score } => {
                    log::info!("Life over at {:.1}s with score {}", elapsed, score)
                }
                _ => {}
            }
        }
    }

    println!(
        "ticks: {}  score: {}  best: {}  resets: {}  landings: {}",
        state.time_ticks, state.score, state.best_score, state.resets, landings
    );
}
