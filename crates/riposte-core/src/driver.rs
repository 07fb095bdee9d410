//! Wall-clock driver that ticks a shared engine on a background thread.
//!
//! The engine stays the single point of mutation: the driver and every
//! command caller go through the same `Mutex`, so a tick and a command can
//! never interleave.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use riposte_core::config::EngineConfig;
//! use riposte_core::driver::RealtimeDriver;
//! use riposte_core::engine::Engine;
//! use riposte_core::skill::SkillCatalog;
//!
//! let engine = Engine::new(EngineConfig::default(), SkillCatalog::bundled(100).unwrap())
//!     .unwrap()
//!     .into_shared();
//! engine.lock().unwrap().start();
//!
//! let driver = RealtimeDriver::spawn(engine.clone(), Duration::from_millis(100));
//! // ... issue commands through engine.lock() ...
//! driver.stop();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::engine::{SharedEngine, TickOutcome};

/// Background ticker for a [`SharedEngine`].
#[derive(Debug)]
pub struct RealtimeDriver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RealtimeDriver {
    /// Spawns a thread calling `tick` once per `interval` until stopped or
    /// until the encounter ends.
    #[must_use]
    pub fn spawn(engine: SharedEngine, interval: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            while flag.load(Ordering::Acquire) {
                thread::sleep(interval);
                let Ok(mut engine) = engine.lock() else {
                    tracing::warn!("engine mutex poisoned; driver exiting");
                    break;
                };
                if engine.tick() == TickOutcome::Ended {
                    tracing::debug!(tick = engine.current_tick(), "encounter over; driver exiting");
                    break;
                }
            }
            flag.store(false, Ordering::Release);
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Returns `true` while the background thread is ticking.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops ticking and joins the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("driver thread panicked");
            }
        }
    }
}

impl Drop for RealtimeDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}
