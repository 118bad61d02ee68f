//! Starfall Headless Simulation Harness
//!
//! Drives the world tick by tick (and optionally on its real-time clock)
//! and checks the invariants the world promises its readers.
//! No rendering, no networking.
//!
//! Usage:
//!   cargo run -p starfall-simtest
//!   cargo run -p starfall-simtest -- --verbose --ticks 20000 --seed 7
//!   cargo run -p starfall-simtest -- --config world.json --realtime-ms 2000

use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use starfall_core::prelude::*;
use starfall_logic::bayes::GammaParams;
use starfall_logic::geometry::Point;
use starfall_logic::gravity::Attractor;
use starfall_logic::markov::MarkovChain;

#[derive(Parser, Debug)]
#[command(name = "starfall-simtest")]
#[command(about = "Headless invariant checks for the Starfall world")]
struct Args {
    /// Print every check, not just failures
    #[arg(long)]
    verbose: bool,

    /// Ticks to run for the world sweeps
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Seed for every random draw
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// World configuration (JSON); defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also run the real-time clock for this many milliseconds
    #[arg(long, default_value_t = 0)]
    realtime_ms: u64,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    println!("=== Starfall Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(&args, &mut results) {
        Some(c) => c,
        None => finish(results, args.verbose),
    };

    // 2. Intensity chain sampling
    results.extend(validate_markov_sampling(&config));

    // 3. Falling and culling
    results.extend(validate_physics(&config, args.ticks));

    // 4. Spawning and region occupancy
    results.extend(validate_spawning(&config, args.ticks));

    // 5. Posterior and density curve
    results.extend(validate_inference(&config, args.ticks));

    // 6. Determinism
    results.extend(validate_determinism(&config));

    // 7. Real-time clock
    if args.realtime_ms > 0 {
        results.extend(validate_realtime(&config, args.realtime_ms, args.verbose));
    }

    finish(results, args.verbose)
}

fn finish(results: Vec<TestResult>, verbose: bool) -> ! {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    std::process::exit(if failed > 0 { 1 } else { 0 })
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn load_config(args: &Args, results: &mut Vec<TestResult>) -> Option<WorldConfig> {
    println!("--- Configuration ---");

    let loaded = match &args.config {
        Some(path) => WorldConfig::from_json_file(path),
        None => Ok(WorldConfig::default()),
    };
    let config = match loaded {
        Ok(c) => c.with_seed(args.seed),
        Err(e) => {
            results.push(check("config_load", false, e.to_string()));
            return None;
        }
    };

    let valid = config.validate();
    results.push(check(
        "config_valid",
        valid.is_ok(),
        match &valid {
            Ok(()) => format!(
                "{}x{} plane, {} states, {} planets",
                config.width,
                config.height,
                config.states.len(),
                config.planets.len()
            ),
            Err(e) => e.to_string(),
        },
    ));

    let region = config.region;
    let inside = config.plane().contains(Point::new(region.x, region.y))
        && config
            .plane()
            .contains(Point::new(region.x + region.width, region.y + region.height));
    results.push(check(
        "config_region_on_plane",
        inside,
        format!("{:?}", config.region),
    ));

    valid.ok().map(|_| config)
}

// ── 2. Intensity Chain ──────────────────────────────────────────────────

fn validate_markov_sampling(config: &WorldConfig) -> Vec<TestResult> {
    println!("--- Intensity Chain ---");
    let mut results = Vec::new();
    const TRIALS: usize = 20_000;
    const TOLERANCE: f64 = 0.02;

    let seed = config.seed.unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(seed);
    let n = config.states.len();

    for from in 0..n {
        let mut chain = match MarkovChain::new(
            config.states.clone(),
            config.transition_matrix.clone(),
            from,
        ) {
            Ok(c) => c,
            Err(e) => {
                results.push(check("markov_build", false, e.to_string()));
                return results;
            }
        };

        let mut counts = vec![0usize; n];
        for _ in 0..TRIALS {
            if chain.set_current(from).is_err() {
                break;
            }
            counts[chain.step(&mut rng)] += 1;
        }

        let worst = counts
            .iter()
            .zip(&config.transition_matrix[from])
            .map(|(&c, &p)| (c as f64 / TRIALS as f64 - p).abs())
            .fold(0.0, f64::max);
        results.push(check(
            &format!("markov_row_{}_frequencies", config.states[from].label),
            worst <= TOLERANCE,
            format!("max deviation {:.4} over {} draws", worst, TRIALS),
        ));
    }

    results
}

// ── 3. Physics ──────────────────────────────────────────────────────────

fn validate_physics(config: &WorldConfig, ticks: u64) -> Vec<TestResult> {
    println!("--- Falling & Culling ---");
    let mut results = Vec::new();

    let mut engine = match SimulationEngine::new(config.clone()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("physics_engine_build", false, e.to_string()));
            return results;
        }
    };
    let plane = config.plane();
    let attractor = Attractor::new(plane.center(), config.gravity, config.epsilon);

    let mut moved_wrong = 0usize;
    let mut cull_wrong = 0usize;
    let mut nonpositive_distance = 0usize;
    let mut culled_total = 0usize;

    for _ in 0..ticks {
        let before: HashMap<ParticleId, (Position, Fall)> = engine
            .world
            .query::<(&ParticleId, &Position, &Fall)>()
            .iter()
            .map(|(_, (id, pos, fall))| (*id, (*pos, *fall)))
            .collect();
        for (pos, _) in before.values() {
            if attractor.distance(pos.point()) <= 0.0 {
                nonpositive_distance += 1;
            }
        }

        let report = engine.update();
        culled_total += report.culled;

        let after: HashMap<ParticleId, Position> = engine.particles().into_iter().collect();
        for (id, (pos, fall)) in &before {
            let next = attractor.step(pos.point(), fall.speed, fall.mass);
            match after.get(id) {
                Some(p) if p.point() != next => moved_wrong += 1,
                Some(_) if !plane.contains(next) => cull_wrong += 1,
                None if plane.contains(next) => cull_wrong += 1,
                _ => {}
            }
        }
    }

    results.push(check(
        "physics_distance_positive",
        nonpositive_distance == 0,
        format!("{} non-positive distances", nonpositive_distance),
    ));
    results.push(check(
        "physics_step_exact",
        moved_wrong == 0,
        format!("{} particles off their computed step", moved_wrong),
    ));
    results.push(check(
        "physics_cull_iff_off_plane",
        cull_wrong == 0,
        format!(
            "{} culling mismatches, {} culled over {} ticks",
            cull_wrong, culled_total, ticks
        ),
    ));

    // Single particle directly above the attractor
    let center = plane.center();
    let scenario = WorldConfig {
        capacity: 1,
        ..config.clone()
    };
    if let Ok(mut single) = SimulationEngine::new(scenario) {
        single.insert_particle(
            Position::new(center.x, 0.0),
            Fall {
                speed: 1.0,
                mass: 1.0,
            },
        );
        single.update();
        let expected = attractor.step(Point::new(center.x, 0.0), 1.0, 1.0);
        let got = single.particles().first().map(|(_, p)| p.point());
        results.push(check(
            "physics_above_center",
            got == Some(expected) && expected.x == center.x && expected.y > 1.0,
            format!("landed at {:?}", got),
        ));
    }

    results
}

// ── 4. Spawning & Occupancy ─────────────────────────────────────────────

fn validate_spawning(config: &WorldConfig, ticks: u64) -> Vec<TestResult> {
    println!("--- Spawning & Occupancy ---");
    let mut results = Vec::new();

    let mut engine = match SimulationEngine::new(config.clone()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("spawn_engine_build", false, e.to_string()));
            return results;
        }
    };

    let mut spawn_wrong = 0usize;
    let mut region_wrong = 0usize;
    let mut peak_live = 0usize;
    for _ in 0..ticks {
        let live_before = engine.live_count();
        let report = engine.update();
        let rate = engine.current_state().rate as usize;
        let expected = if live_before < config.capacity { rate } else { 0 };
        if report.spawned != expected {
            spawn_wrong += 1;
        }

        let inside = engine
            .particles()
            .iter()
            .filter(|(_, p)| config.region.contains(p.point()))
            .count() as u32;
        if inside != report.region_count {
            region_wrong += 1;
        }
        peak_live = peak_live.max(report.live);
    }

    results.push(check(
        "spawn_rate_follows_state",
        spawn_wrong == 0,
        format!("{} ticks spawned the wrong count", spawn_wrong),
    ));
    let max_rate = config.states.iter().map(|s| s.rate as usize).max().unwrap_or(0);
    results.push(check(
        "spawn_capacity_respected",
        peak_live < config.capacity + max_rate,
        format!("peak {} live, capacity {}", peak_live, config.capacity),
    ));
    results.push(check(
        "region_count_exact",
        region_wrong == 0,
        format!("{} ticks with a miscounted region", region_wrong),
    ));
    results.push(check(
        "history_bounded",
        engine.region_counts.len() <= config.history_len
            && engine.observations.len() <= config.history_len,
        format!(
            "{} region counts, {} observations (cap {})",
            engine.region_counts.len(),
            engine.observations.len(),
            config.history_len
        ),
    ));

    // Forced medium state
    if let Ok(mut medium) = SimulationEngine::new(config.clone()) {
        if let Some(index) = config.states.iter().position(|s| s.label == "medium") {
            let forced = medium.set_intensity_state(index).is_ok();
            let report = medium.update();
            results.push(check(
                "spawn_medium_state",
                forced && report.spawned == config.states[index].rate as usize,
                format!("spawned {}", report.spawned),
            ));
        }
    }

    results
}

// ── 5. Inference ────────────────────────────────────────────────────────

fn validate_inference(config: &WorldConfig, ticks: u64) -> Vec<TestResult> {
    println!("--- Posterior ---");
    let mut results = Vec::new();

    let mut engine = match SimulationEngine::new(config.clone()) {
        Ok(e) => e,
        Err(e) => {
            results.push(check("inference_engine_build", false, e.to_string()));
            return results;
        }
    };

    let prior_only = engine.statistical_snapshot().bayesian;
    results.push(check(
        "posterior_prior_only",
        prior_only.alpha_post == config.prior.alpha && prior_only.beta_post == config.prior.beta,
        format!("({}, {})", prior_only.alpha_post, prior_only.beta_post),
    ));
    let curve_ok = prior_only.x_vals.len() == config.curve.points
        && prior_only.y_vals.len() == config.curve.points
        && prior_only
            .x_vals
            .iter()
            .zip(&prior_only.y_vals)
            .all(|(&x, &y)| (y - config.prior.pdf(x)).abs() < 1e-12);
    results.push(check(
        "posterior_prior_curve",
        curve_ok,
        format!("{} points on [0, {}]", config.curve.points, config.curve.x_max),
    ));

    for _ in 0..ticks {
        engine.update();
    }
    let stats = engine.statistical_snapshot();
    let sum: u64 = engine.observations.iter().map(|&o| o as u64).sum();
    let n = engine.observations.len() as f64;
    let expected = GammaParams::new(config.prior.alpha + sum as f64, config.prior.beta + n);
    results.push(check(
        "posterior_conjugate",
        stats.bayesian.alpha_post == expected.alpha && stats.bayesian.beta_post == expected.beta,
        format!(
            "Gamma({}, {}) after {} observations, mean {:.3} sd {:.3}",
            expected.alpha,
            expected.beta,
            n,
            expected.mean(),
            expected.variance().sqrt()
        ),
    ));
    results.push(check(
        "region_counts_exposed",
        stats.region_counts.len() <= config.exposed_region_counts
            && stats.region_counts == engine.region_counts.tail(config.exposed_region_counts),
        format!("{} exposed", stats.region_counts.len()),
    ));

    results
}

// ── 6. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &WorldConfig) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let (Ok(mut a), Ok(mut b)) = (
        SimulationEngine::new(config.clone()),
        SimulationEngine::new(config.clone()),
    ) else {
        return vec![check("determinism_build", false, "engine build failed")];
    };

    let mut diverged_at = None;
    for _ in 0..1_000 {
        if a.update() != b.update() {
            diverged_at = Some(a.tick());
            break;
        }
    }
    vec![check(
        "determinism_same_seed",
        diverged_at.is_none() && a.particles() == b.particles(),
        match diverged_at {
            Some(t) => format!("diverged at tick {}", t),
            None => "1000 ticks identical".to_string(),
        },
    )]
}

// ── 7. Real-time Clock ──────────────────────────────────────────────────

fn validate_realtime(config: &WorldConfig, run_ms: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Real-time Clock ---");
    let mut results = Vec::new();

    let runner = match SimulationRunner::start(config.clone()) {
        Ok(r) => r,
        Err(e) => {
            results.push(check("clock_start", false, e.to_string()));
            return results;
        }
    };
    thread::sleep(Duration::from_millis(run_ms));

    let view = runner.view();
    let expected_ticks = run_ms / config.tick_interval_ms.max(1);
    info!("clock reached tick {} in {} ms", view.tick, run_ms);
    results.push(check(
        "clock_advancing",
        runner.is_running() && view.tick > 0 && view.tick <= expected_ticks + 1,
        format!("tick {} after {} ms (at most {})", view.tick, run_ms, expected_ticks + 1),
    ));

    let spatial = runner.spatial_snapshot();
    let stats = runner.statistical_snapshot();
    if verbose {
        for (label, json) in [
            ("spatial", serde_json::to_string_pretty(&spatial)),
            ("statistical", serde_json::to_string_pretty(&stats)),
        ] {
            match json {
                Ok(text) => println!("{} snapshot:\n{}", label, text),
                Err(e) => println!("{} snapshot failed to serialize: {}", label, e),
            }
        }
    }
    results.push(check(
        "clock_snapshots_serialize",
        serde_json::to_value(&spatial).is_ok() && serde_json::to_value(&stats).is_ok(),
        format!("{} particles published", spatial.particles.len()),
    ));

    runner.shutdown();
    results
}
