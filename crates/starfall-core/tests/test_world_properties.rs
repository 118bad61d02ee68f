//! Integration tests for whole-world tick behavior.
//!
//! Exercises: WorldConfig → SimulationEngine::update → WorldView →
//! SpatialSnapshot / StatisticalSnapshot
//!
//! All tests run the engine directly on the test thread with a fixed seed.

use std::collections::HashMap;

use starfall_core::prelude::*;
use starfall_logic::geometry::Point;
use starfall_logic::gravity::Attractor;

// ── Helpers ────────────────────────────────────────────────────────────

fn engine(seed: u64) -> SimulationEngine {
    SimulationEngine::new(WorldConfig::default().with_seed(seed)).unwrap()
}

fn attractor(config: &WorldConfig) -> Attractor {
    Attractor::new(config.plane().center(), config.gravity, config.epsilon)
}

/// id -> (position, fall) for every live particle.
fn live(engine: &SimulationEngine) -> HashMap<u64, (Position, Fall)> {
    engine
        .world
        .query::<(&ParticleId, &Position, &Fall)>()
        .iter()
        .map(|(_, (id, pos, fall))| (id.0, (*pos, *fall)))
        .collect()
}

// ── Physics ────────────────────────────────────────────────────────────

#[test]
fn distance_denominator_is_always_positive() {
    let mut engine = engine(10);
    let a = attractor(engine.config());
    for _ in 0..1_000 {
        engine.update();
        for (_, (pos, _)) in live(&engine) {
            assert!(a.distance(pos.point()) > 0.0);
        }
    }
    let at_center = a.distance(a.center);
    assert!(at_center > 0.0);
}

#[test]
fn particle_culled_iff_step_leaves_plane() {
    let mut engine = engine(11);
    let a = attractor(engine.config());
    let plane = engine.config().plane();

    for _ in 0..1_500 {
        let before = live(&engine);
        engine.update();
        let after = live(&engine);

        for (id, (pos, fall)) in &before {
            let next = a.step(pos.point(), fall.speed, fall.mass);
            assert_eq!(
                after.contains_key(id),
                plane.contains(next),
                "particle {id} at {next:?}"
            );
            if let Some((p, _)) = after.get(id) {
                assert_eq!(p.point(), next);
            }
        }
    }
}

#[test]
fn particle_above_center_first_tick() {
    let config = WorldConfig {
        capacity: 1,
        ..WorldConfig::default().with_seed(12)
    };
    let mut engine = SimulationEngine::new(config).unwrap();
    let center = engine.config().plane().center();
    let id = engine.insert_particle(
        Position::new(center.x, 0.0),
        Fall {
            speed: 1.0,
            mass: 1.0,
        },
    );

    // At capacity: the inserted particle is the only one.
    engine.update();
    let particles = engine.particles();
    assert_eq!(particles.len(), 1);
    let (got_id, pos) = particles[0];
    assert_eq!(got_id, id);
    assert_eq!(pos.x, center.x);

    let distance = center.y + 0.1;
    let expected_y = 1.0 + 100.0 / (distance * distance) * center.y / distance;
    assert!((pos.y - expected_y).abs() < 1e-12);
}

#[test]
fn particle_exactly_at_center_advances_by_speed() {
    let config = WorldConfig {
        capacity: 1,
        ..WorldConfig::default().with_seed(13)
    };
    let mut engine = SimulationEngine::new(config).unwrap();
    let center = engine.config().plane().center();
    engine.insert_particle(
        Position::new(center.x, center.y),
        Fall {
            speed: 1.0,
            mass: 1.0,
        },
    );
    engine.update();
    let (_, pos) = engine.particles()[0];
    assert_eq!(pos, Position::new(center.x, center.y + 1.0));
}

// ── Spawning and intensity ─────────────────────────────────────────────

#[test]
fn medium_state_spawns_exactly_two() {
    let mut engine = engine(14);
    engine.set_intensity_state(1).unwrap();
    assert_eq!(engine.current_state().label, "medium");
    let report = engine.update();
    assert_eq!(report.spawned, 2);
}

#[test]
fn spawn_count_follows_current_state_every_tick() {
    let mut engine = engine(15);
    for _ in 0..2_000 {
        let live_before = engine.live_count();
        let report = engine.update();
        let rate = engine.current_state().rate as usize;
        if live_before < engine.config().capacity {
            assert_eq!(report.spawned, rate);
        } else {
            assert_eq!(report.spawned, 0);
        }
        assert!(report.live < engine.config().capacity + 3);
    }
}

#[test]
fn observations_are_rates_of_new_states() {
    let mut engine = engine(16);
    let rates = engine.chain.rates();
    for _ in 0..3_000 {
        let report = engine.update();
        if let Some(t) = report.transition {
            assert_eq!(t.rate, rates[t.to]);
            assert_eq!(engine.observations.to_vec().last(), Some(&t.rate));
            assert_eq!(report.tick % 100, 0);
        }
    }
    assert_eq!(engine.observations.len(), 30);
}

// ── Occupancy and history ──────────────────────────────────────────────

#[test]
fn region_count_matches_particles_in_region() {
    let mut engine = engine(17);
    let region = engine.config().region;
    let mut saw_occupied = false;
    for _ in 0..1_500 {
        let report = engine.update();
        let inside = engine
            .particles()
            .iter()
            .filter(|(_, p)| region.contains(p.point()))
            .count() as u32;
        assert_eq!(report.region_count, inside);
        assert_eq!(engine.region_counts.to_vec().last(), Some(&inside));
        saw_occupied |= inside > 0;
    }
    assert!(saw_occupied);
}

#[test]
fn histories_slide_fifo() {
    let config = WorldConfig {
        history_len: 10,
        ..WorldConfig::default().with_seed(18)
    };
    let mut engine = SimulationEngine::new(config).unwrap();
    for _ in 0..10 {
        engine.update();
    }
    let full = engine.region_counts.to_vec();
    let report = engine.update();
    let slid = engine.region_counts.to_vec();
    assert_eq!(slid.len(), 10);
    assert_eq!(&slid[..9], &full[1..]);
    assert_eq!(slid[9], report.region_count);
}

// ── Snapshots ──────────────────────────────────────────────────────────

#[test]
fn prior_only_statistical_snapshot() {
    let engine = engine(19);
    let stats = engine.statistical_snapshot();
    assert_eq!(stats.bayesian.alpha_post, 2.0);
    assert_eq!(stats.bayesian.beta_post, 1.0);
    assert_eq!(stats.bayesian.x_vals.len(), 200);
    assert_eq!(stats.bayesian.y_vals.len(), 200);
    assert_eq!(stats.bayesian.x_vals[199], 10.0);
    for (&x, &y) in stats.bayesian.x_vals.iter().zip(&stats.bayesian.y_vals) {
        assert!((y - x * (-x).exp()).abs() < 1e-12);
    }
    assert_eq!(stats.markov.states, vec!["low", "medium", "high"]);
    assert_eq!(stats.markov.rates, vec![1, 2, 3]);
    assert_eq!(stats.markov.current_state, 1);
    assert!(stats.region_counts.is_empty());
}

#[test]
fn posterior_matches_window_after_many_epochs() {
    let mut engine = engine(20);
    for _ in 0..60_000 {
        engine.update();
    }
    // 600 epochs, window of 500.
    assert_eq!(engine.observations.len(), 500);
    let sum: u32 = engine.observations.iter().sum();
    let stats = engine.statistical_snapshot();
    assert_eq!(stats.bayesian.alpha_post, 2.0 + sum as f64);
    assert_eq!(stats.bayesian.beta_post, 501.0);
    assert_eq!(stats.region_counts.len(), 50);
    assert_eq!(stats.region_counts, engine.region_counts.tail(50));
}

#[test]
fn spatial_snapshot_json_contract() {
    let mut engine = engine(21);
    for _ in 0..5 {
        engine.update();
    }
    let json = serde_json::to_value(engine.spatial_snapshot()).unwrap();

    let meteors = json["meteors"].as_array().unwrap();
    assert_eq!(meteors.len(), engine.live_count());
    for m in meteors {
        let keys: Vec<&str> = m.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 3);
        assert!(m["id"].is_u64() && m["x"].is_f64() && m["y"].is_f64());
    }

    let sun = &json["sun"];
    for key in ["x", "y", "radius", "color", "orbit_radius", "orbit_color", "moons"] {
        assert!(!sun[key].is_null(), "sun.{key} missing");
    }
    assert_eq!(sun["color"], serde_json::json!([255, 255, 0]));
    assert_eq!(sun["x"], serde_json::json!(400.0));

    let planets = json["planets"].as_array().unwrap();
    assert_eq!(planets.len(), 4);
    let moon = &planets[1]["moons"][0];
    let moon_keys: Vec<&str> = moon.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(moon_keys.len(), 4);
    for key in ["x", "y", "radius", "color"] {
        assert!(moon_keys.contains(&key));
    }

    assert_eq!(
        json["region"],
        serde_json::json!({"x": 300.0, "y": 200.0, "width": 200.0, "height": 200.0})
    );
    assert_eq!(json["center"], serde_json::json!({"x": 400.0, "y": 300.0}));
}

#[test]
fn statistical_snapshot_json_contract() {
    let json = serde_json::to_value(engine(22).statistical_snapshot()).unwrap();
    assert_eq!(json["markov"]["states"], serde_json::json!(["low", "medium", "high"]));
    assert_eq!(json["markov"]["rates"], serde_json::json!([1, 2, 3]));
    assert_eq!(json["markov"]["current_state"], serde_json::json!(1));
    assert!(json["region_counts"].is_array());
    let bayes = &json["bayesian"];
    assert_eq!(bayes["x_vals"].as_array().unwrap().len(), 200);
    assert_eq!(bayes["y_vals"].as_array().unwrap().len(), 200);
    assert_eq!(bayes["alpha_post"], serde_json::json!(2.0));
    assert_eq!(bayes["beta_post"], serde_json::json!(1.0));
}

#[test]
fn moons_in_snapshot_orbit_their_planet() {
    let mut engine = engine(23);
    for _ in 0..37 {
        engine.update();
    }
    let spatial = engine.spatial_snapshot();
    for (planet, body) in spatial.planets.iter().zip(&engine.planets) {
        for (moon, moon_body) in planet.moons.iter().zip(&body.moons) {
            let expected = moon_body.orbit.position_about(Point::new(planet.x, planet.y));
            assert!((moon.x - expected.x).abs() < 1e-9);
            assert!((moon.y - expected.y).abs() < 1e-9);
        }
    }
}
