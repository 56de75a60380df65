//! Vessel Engine - headless runner.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vessel_engine::infrastructure::random::SystemRandom;
use vessel_engine::{Actor, EngineConfig, Simulation, Topology};
use vessel_domain::{Entity, EntityId};

/// Entities closer than this may try to contain each other.
const ENCOUNTER_RADIUS: f32 = 32.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the runner may be started from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vessel_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Vessel Engine");

    let config = EngineConfig::load()?;
    tracing::info!(
        tick_rate_hz = config.tick_rate_hz,
        max_ticks = ?config.max_ticks,
        topology = ?config.topology,
        population = config.population.len(),
        "Configuration loaded"
    );

    let mut simulation = Simulation::new(
        config.topology,
        config.containment.clone(),
        Arc::new(SystemRandom::new()),
    );
    for template in &config.population {
        simulation.spawn(Box::new(Actor::from_template(template)))?;
    }

    let mut interval = tokio::time::interval(config.tick_period());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_tick(&mut simulation);
                if config.max_ticks.is_some_and(|max| simulation.step_count() >= max) {
                    tracing::info!(steps = simulation.step_count(), "Tick budget reached");
                    break;
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
                }
                tracing::info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    let entities = simulation.end_session();
    tracing::info!(entities = entities.len(), "Vessel Engine stopped");
    Ok(())
}

fn run_tick(simulation: &mut Simulation) {
    simulation.step();

    for (holder, target) in encounters(simulation) {
        if simulation.attempt_opportunistic_contain(holder, target) {
            tracing::info!(holder = %holder, occupant = %target, "Opportunistic containment");
        }
    }

    for event in simulation.drain_events() {
        tracing::debug!(kind = event.kind(), event = ?event, "Simulation event");
    }

    // No server connection in the headless runner; queued syncs are dropped.
    if simulation.topology() == Topology::Client {
        let dropped = simulation.drain_outbound().len();
        if dropped > 0 {
            tracing::debug!(dropped, "Discarded containment syncs without a server");
        }
    }

    for entity in simulation.despawn_invalid() {
        tracing::info!(entity = %entity.id(), name = entity.name(), "Entity left the simulation");
    }
}

/// Ordered pairs of nearby entities that could try an opportunistic containment.
fn encounters(simulation: &Simulation) -> Vec<(EntityId, EntityId)> {
    let ids = simulation.ids();
    let mut pairs = Vec::new();
    for holder in &ids {
        for target in &ids {
            if holder == target || !simulation.can_opportunistic_contain(*holder, *target) {
                continue;
            }
            let (Some(h), Some(t)) = (simulation.entity(*holder), simulation.entity(*target))
            else {
                continue;
            };
            let gap = h.position() - t.position();
            if gap.x.hypot(gap.y) <= ENCOUNTER_RADIUS {
                pairs.push((*holder, *target));
            }
        }
    }
    pairs
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
