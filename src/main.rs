//! Klax 3D entry point
//!
//! The browser build is driven from JavaScript through `klax::web`. Natively
//! this runs a headless attract-mode game: the autopilot plays at a simulated
//! 30 fps presentation rate while the fixed-step clock keeps the sim at 60 Hz.
//!
//! Usage: `klax [seed] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use klax::sim::{GameEvent, autopilot};
    use klax::{Engine, FixedStep, HighScores};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());
    let seconds = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(300);

    let mut engine = match seed {
        Some(seed) => {
            log::info!("Klax 3D (native) starting with seed {}", seed);
            Engine::new(seed)
        }
        None => {
            log::info!("Klax 3D (native) starting with clock seed");
            Engine::from_clock()
        }
    };

    const FRAME_DT: f64 = 1.0 / 30.0;
    let mut clock = FixedStep::new();
    let mut matches = 0u32;
    let mut lives_lost = 0u32;

    'frames: for _ in 0..seconds * 30 {
        let ticks = clock.advance(FRAME_DT);
        for _ in 0..ticks {
            let action = autopilot::choose_action(&engine.snapshot());
            autopilot::apply(&mut engine, action);
            engine.update();

            for event in engine.events() {
                match event {
                    GameEvent::Matched { source, points, .. } => {
                        matches += 1;
                        log::debug!("{:?} match +{}", source, points);
                    }
                    GameEvent::LifeLost { lives, reason } => {
                        lives_lost += 1;
                        log::info!("Life lost: {} ({} left)", reason.as_str(), lives);
                    }
                    GameEvent::LevelUp { level } => log::info!("Level {}", level),
                    _ => {}
                }
            }

            if engine.is_game_over() {
                break 'frames;
            }
        }
    }

    let snap = engine.snapshot();
    println!(
        "score {} | level {} | lives {} | matches {} | lives lost {} | ticks {}{}",
        snap.score,
        snap.level,
        snap.lives,
        matches,
        lives_lost,
        snap.tick,
        if snap.game_over { " | GAME OVER" } else { "" }
    );

    let mut high_scores = HighScores::load();
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    if let Some(rank) = high_scores.add_score(snap.score, snap.level, timestamp) {
        println!("High score rank #{rank}");
        high_scores.save();
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is klax::web::wasm_start, this is just to satisfy the compiler
}
