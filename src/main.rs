// Headless demo: runs a seeded stage on the fixed-step clock and logs
// what happens. Rendering and input belong to a front end; this binary
// exercises the simulation alone.

use anyhow::Result;
use rusted_invaders::core::time::FrameClock;
use rusted_invaders::engine::audio::{Sound, SoundPlayer};
use rusted_invaders::game::entities::spaceship::ShipCommand;
use rusted_invaders::game::events::GameEvent;
use rusted_invaders::game::stage::{Stage, StageConfig};
use glam::Vec2;
use std::time::Duration;

/// Forwards sound requests to the log
struct LoggingSoundPlayer;

impl SoundPlayer for LoggingSoundPlayer {
    fn play(&mut self, sound: Sound) {
        log::debug!("sound: {sound:?}");
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = StageConfig {
        level: 1,
        players: 1,
        bounds: Vec2::new(800.0, 600.0),
        seed: 42,
    };
    log::info!(
        "starting level {} on a {}x{} playfield",
        config.level,
        config.bounds.x,
        config.bounds.y
    );
    let mut stage = Stage::new(config, Box::new(LoggingSoundPlayer))?;

    let mut clock = FrameClock::default();
    let frame = Duration::from_micros(16_667);
    let mut direction = 1.0;

    // Scripted pilot: sweep back and forth, firing constantly
    for second in 0..120 {
        for _ in 0..60 {
            if stage.is_over() {
                break;
            }
            stage.command(
                0,
                ShipCommand {
                    steer: direction,
                    fire: true,
                },
            );
            let steps = clock.advance(frame);
            for _ in 0..steps {
                let time = clock.tick();
                for event in stage.update(time) {
                    match event {
                        GameEvent::Killed(id) => log::info!("kill: {id:?}"),
                        GameEvent::Score { ship, delta } => {
                            log::debug!("score {delta:+} for {ship:?}")
                        }
                        GameEvent::AllEnemiesDead => log::info!("wave cleared"),
                        GameEvent::EnemiesReachedBottom => log::info!("invasion landed"),
                        GameEvent::OutOfSouls(id) => log::info!("out of souls: {id:?}"),
                        _ => {}
                    }
                }
            }
        }
        if second % 4 == 3 {
            direction = -direction;
        }
        if stage.is_over() {
            break;
        }
    }

    log::info!(
        "finished: score {}, souls {}, {} enemies left",
        stage.score(0),
        stage.souls(0),
        stage.alive_enemies()
    );
    Ok(())
}
