//! World clock - runs the engine on a background thread at a fixed cadence
//! and publishes a fresh [`WorldView`] after every tick.
//!
//! The clock thread is the only writer. Readers take a cheap clone of the
//! latest published `Arc<WorldView>`; the lock is held only for the pointer
//! swap or clone, so neither side waits on the other's work and no reader
//! ever sees a half-applied tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::config::WorldConfig;
use crate::engine::SimulationEngine;
use crate::error::EngineError;
use crate::snapshot::{SpatialSnapshot, StatisticalSnapshot, WorldView};

type SharedView = Arc<RwLock<Arc<WorldView>>>;

/// Handle to the running world clock.
pub struct SimulationRunner {
    view: SharedView,
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    /// Set once readers have been warned that the view is no longer advancing.
    stale_warned: AtomicBool,
}

impl SimulationRunner {
    /// Validate `config`, build the world and start ticking.
    pub fn start(config: WorldConfig) -> Result<Self, EngineError> {
        let engine = SimulationEngine::new(config)?;
        Self::start_engine(engine)
    }

    /// Start ticking an already-built engine.
    pub fn start_engine(engine: SimulationEngine) -> Result<Self, EngineError> {
        let interval = Duration::from_millis(engine.config().tick_interval_ms);
        let view: SharedView = Arc::new(RwLock::new(Arc::new(engine.view())));
        let shutdown = Arc::new(AtomicBool::new(false));

        let view_clone = Arc::clone(&view);
        let shutdown_clone = Arc::clone(&shutdown);
        let thread = thread::Builder::new()
            .name("starfall-clock".to_string())
            .spawn(move || clock_loop(engine, &view_clone, &shutdown_clone, interval))
            .map_err(EngineError::Thread)?;

        info!("world clock started ({} ms per tick)", interval.as_millis());

        Ok(Self {
            view,
            shutdown,
            thread: Some(thread),
            stale_warned: AtomicBool::new(false),
        })
    }

    /// Latest published view. Warns once if the clock has stopped and the
    /// view is frozen.
    pub fn view(&self) -> Arc<WorldView> {
        let view = match self.view.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => {
                warn!("world view lock poisoned; serving last published view");
                Arc::clone(&poisoned.into_inner())
            }
        };
        if !self.is_running() && !self.stale_warned.swap(true, Ordering::SeqCst) {
            warn!(
                "world clock is not running; view frozen at tick {}",
                view.tick
            );
        }
        view
    }

    pub fn spatial_snapshot(&self) -> SpatialSnapshot {
        self.view().spatial()
    }

    pub fn statistical_snapshot(&self) -> StatisticalSnapshot {
        self.view().statistical()
    }

    /// False once the clock thread has exited (shut down or panicked).
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop at the next tick boundary and wait for the clock thread.
    pub fn shutdown(mut self) {
        self.stop();
        info!("world clock stopped");
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("world clock thread panicked");
            }
        }
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Logs from the clock thread itself when it unwinds.
struct ClockExitGuard;

impl Drop for ClockExitGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("world clock thread panicked; readers keep the last published view");
        }
    }
}

/// Tick, publish, sleep out the rest of the interval; until shut down.
fn clock_loop(
    mut engine: SimulationEngine,
    view: &RwLock<Arc<WorldView>>,
    shutdown: &AtomicBool,
    interval: Duration,
) {
    let _guard = ClockExitGuard;
    while !shutdown.load(Ordering::SeqCst) {
        let started = Instant::now();
        engine.update();
        let next = Arc::new(engine.view());
        match view.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => {
                warn!("world view lock poisoned; replacing view");
                *poisoned.into_inner() = next;
            }
        }
        thread::sleep(interval.saturating_sub(started.elapsed()));
    }
    info!("world clock exiting after tick {}", engine.tick());
}
