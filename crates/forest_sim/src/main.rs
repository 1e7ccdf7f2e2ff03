//! Headless encounter driver
//!
//! Runs a scripted forest encounter against the enemy simulation and logs
//! what happens. Useful for tuning config files without the game client.
//!
//! Run with: cargo run -p forest_sim
//!       or: FOREST_DIFFICULTY=extreme RUST_LOG=debug cargo run --bin forest-sim

use forest_sim::prelude::*;

const TICK_RATE: f32 = 60.0;
const DURATION_SECS: f32 = 30.0;
const FIRE_INTERVAL_SECS: f32 = 0.75;
const WAVE_INTERVAL_SECS: f32 = 6.0;
const PLAYER_DAMAGE: f32 = 20.0;
const PLAYER_RANGE: f32 = 35.0;
const DIRECTOR_AT_SECS: f32 = 12.0;
const MEDKIT: f32 = 25.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::load();
    if let Some(path) = &config.config_path {
        log::info!("Using {}", path);
    }

    if let Err(e) = run(config) {
        log::error!("Encounter aborted: {}", e);
        std::process::exit(1);
    }
}

fn forest() -> Vec<TerrainObstacle> {
    vec![
        TerrainObstacle::new(8.0, 12.0, 1.5),
        TerrainObstacle::new(-10.0, 20.0, 2.0),
        TerrainObstacle::new(25.0, -6.0, 1.2),
        TerrainObstacle::new(40.0, 18.0, 3.0),
        TerrainObstacle::decorative(5.0, 5.0, 0.5),
    ]
}

fn spawn_wave(world: &mut EnemyWorld, around: Vec3, wave: u32) -> Result<()> {
    let count = (3.0 * world.difficulty().enemy_spawn_rate).round().max(1.0) as u32;
    for i in 0..count {
        let angle = (i as f32 / count as f32) * std::f32::consts::TAU + wave as f32;
        let offset = Vec3::from_yaw(angle) * 45.0;
        world.spawn_random(around + offset)?;
    }
    log::info!("Wave {}: {} enemies ({} alive)", wave, count, world.alive_count());
    Ok(())
}

fn nearest_target(world: &EnemyWorld, from: Vec3) -> Option<EnemyId> {
    world
        .iter()
        .filter(|(_, e)| e.is_alive())
        .map(|(id, e)| (id, e.position().planar_distance(from)))
        .filter(|(_, d)| *d <= PLAYER_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn run(config: SimConfig) -> Result<()> {
    let mut world = EnemyWorld::new(config, 0x5eed).with_obstacles(forest());
    let mut player = PlayerState::new(Vec3::ZERO).with_velocity(Vec3::ground(2.0, 0.5));

    let dt = 1.0 / TICK_RATE;
    let mut elapsed = 0.0f32;
    let mut next_fire = FIRE_INTERVAL_SECS;
    let mut next_wave = 0.0f32;
    let mut wave = 0;
    let mut director_request = None;
    let mut hits_taken = 0usize;

    while elapsed < DURATION_SECS && player.is_alive() {
        if elapsed >= next_wave {
            wave += 1;
            if wave > 1 {
                let healed = player.health.heal(MEDKIT);
                log::info!("Medkit: +{:.0} hp ({:.0}%)", healed, player.health.fraction() * 100.0);
            }
            spawn_wave(&mut world, player.position, wave)?;
            next_wave += WAVE_INTERVAL_SECS;
        }

        if director_request.is_none() && elapsed >= DIRECTOR_AT_SECS {
            director_request = Some(world.director_handle().spawn_request(|| {
                Ok(r#"Player is cruising. {"enemySpawnRate": 1.6, "enemyDifficulty": 1.5,
                    "enemySpeed": 1.3, "timeOfDay": "night", "atmosphere": "stormy",
                    "intensity": "intense"}"#
                    .to_string())
            }));
        }

        player.position += player.velocity * dt;

        if elapsed >= next_fire {
            next_fire += FIRE_INTERVAL_SECS;
            world.player_fired(player.position, 1.0);
            if let Some(target) = nearest_target(&world, player.position) {
                world.damage_enemy(target, PLAYER_DAMAGE)?;
            }
        }

        let report = world.tick(dt, &mut player);
        for (id, hit) in &report.hits {
            hits_taken += 1;
            log::debug!("{} hit player for {:.1} ({:?})", id, hit.amount, hit.source);
        }
        if report.difficulty_changed {
            log::info!("Director changed difficulty at {:.1}s", elapsed);
        }

        elapsed += dt;
    }

    if let Some(request) = director_request {
        if request.join().is_err() {
            log::warn!("Director request thread panicked");
        }
    }

    let stats = world.stats();
    log::info!(
        "Encounter over after {:.1}s: player {:.0}/{:.0} hp, {} hits taken",
        elapsed,
        player.health.current,
        player.health.max,
        hits_taken
    );
    log::info!(
        "Spawned {} / killed {} / despawned {} / score {} ({} still in world)",
        stats.spawned,
        stats.killed,
        stats.despawned,
        stats.score,
        world.len()
    );
    Ok(())
}
