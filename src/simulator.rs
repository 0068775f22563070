// src/simulator.rs
//! Periodic fleet simulation loop

use crate::{
    error::{FleetError, Result},
    fleet::{Fleet, TickSummary, Vehicle},
};
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, RwLock,
    },
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(800);
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Source of wall-clock time for ZDA sentences
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Owns the fleet and drives it on a fixed period.
///
/// Placement and ticks both take the fleet write lock for their whole
/// duration, so observers only ever see complete transitions. Every transition
/// publishes a fresh snapshot on the watch channel.
pub struct FleetSimulator {
    fleet: Arc<RwLock<Fleet>>,
    run: Mutex<Option<Arc<AtomicBool>>>, // stop flag of the current run
    clock: Arc<dyn Clock>,
    period: Duration,
    updates: Arc<watch::Sender<Vec<Vehicle>>>,
}

impl FleetSimulator {
    /// Create a simulator around an existing fleet, using the system clock
    pub fn new(fleet: Fleet, period: Duration) -> Self {
        Self::with_clock(fleet, period, Arc::new(SystemClock))
    }

    /// Create a simulator with an explicit clock.
    ///
    /// Periods below one millisecond are raised to one millisecond.
    pub fn with_clock(fleet: Fleet, period: Duration, clock: Arc<dyn Clock>) -> Self {
        let (updates, _) = watch::channel(fleet.vehicles().to_vec());
        if period < MIN_TICK_INTERVAL {
            tracing::warn!(period_ms = period.as_millis() as u64, "tick period too short, clamping");
        }
        Self {
            fleet: Arc::new(RwLock::new(fleet)),
            run: Mutex::new(None),
            clock,
            period: period.max(MIN_TICK_INTERVAL),
            updates: Arc::new(updates),
        }
    }

    /// Place a new vehicle and return its id
    pub fn place_vehicle(&self, latitude: f64, longitude: f64) -> Result<u32> {
        let mut fleet = self.write_fleet()?;
        let id = fleet.place_vehicle(latitude, longitude)?;
        self.updates.send_replace(fleet.vehicles().to_vec());
        Ok(id)
    }

    /// Run a single tick with the given random source
    pub fn step<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TickSummary> {
        tick_and_publish(&self.fleet, &self.updates, self.clock.as_ref(), rng)
    }

    /// Spawn the periodic tick task on the current tokio runtime, seeding
    /// the random source from the OS
    pub fn start(&self) -> Result<JoinHandle<()>> {
        self.start_with_rng(StdRng::from_os_rng())
    }

    /// Spawn the periodic tick task drawing from `rng`.
    ///
    /// Each run gets its own stop flag. Starting again stops the previous run
    /// first, so at most one task ever ticks the fleet.
    pub fn start_with_rng(&self, mut rng: StdRng) -> Result<JoinHandle<()>> {
        let run_flag = Arc::new(AtomicBool::new(true));
        if let Some(previous) = self.lock_run()?.replace(Arc::clone(&run_flag)) {
            previous.store(false, Ordering::Relaxed);
        }

        let fleet = Arc::clone(&self.fleet);
        let clock = Arc::clone(&self.clock);
        let updates = Arc::clone(&self.updates);
        let period = self.period;

        tracing::info!(period_ms = period.as_millis() as u64, "starting fleet simulation");

        Ok(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // the first tick of an interval completes immediately
            interval.tick().await;

            while run_flag.load(Ordering::Relaxed) {
                interval.tick().await;
                if !run_flag.load(Ordering::Relaxed) {
                    break;
                }
                if let Err(e) = tick_and_publish(&fleet, &updates, clock.as_ref(), &mut rng) {
                    tracing::error!(error = %e, "simulation tick failed");
                    break;
                }
            }

            run_flag.store(false, Ordering::Relaxed);
            tracing::info!("fleet simulation stopped");
        }))
    }

    /// Stop the periodic task after its current tick
    pub fn stop(&self) {
        if let Ok(mut run) = self.run.lock() {
            if let Some(flag) = run.take() {
                flag.store(false, Ordering::Relaxed);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.run
            .lock()
            .map(|run| run.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)))
            .unwrap_or(false)
    }

    /// Receive a vehicle snapshot after every placement and tick
    pub fn subscribe(&self) -> watch::Receiver<Vec<Vehicle>> {
        self.updates.subscribe()
    }

    /// Get a copy of the current vehicles
    pub fn snapshot(&self) -> Result<Vec<Vehicle>> {
        let fleet = self
            .fleet
            .read()
            .map_err(|_| FleetError::Other("fleet lock poisoned".to_string()))?;
        Ok(fleet.vehicles().to_vec())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn lock_run(&self) -> Result<MutexGuard<'_, Option<Arc<AtomicBool>>>> {
        self.run
            .lock()
            .map_err(|_| FleetError::Other("run state lock poisoned".to_string()))
    }

    fn write_fleet(&self) -> Result<std::sync::RwLockWriteGuard<'_, Fleet>> {
        self.fleet
            .write()
            .map_err(|_| FleetError::Other("fleet lock poisoned".to_string()))
    }
}

fn tick_and_publish<R: Rng + ?Sized>(
    fleet: &RwLock<Fleet>,
    updates: &watch::Sender<Vec<Vehicle>>,
    clock: &dyn Clock,
    rng: &mut R,
) -> Result<TickSummary> {
    let mut fleet = fleet
        .write()
        .map_err(|_| FleetError::Other("fleet lock poisoned".to_string()))?;
    let summary = fleet.tick(rng, clock.now());
    updates.send_replace(fleet.vehicles().to_vec());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea::decode_zda;
    use chrono::TimeZone;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn simulator() -> FleetSimulator {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 12, 1, 18, 30, 5).unwrap());
        FleetSimulator::with_clock(Fleet::new(), DEFAULT_TICK_INTERVAL, Arc::new(clock))
    }

    #[test]
    fn test_place_two_vehicles() {
        let sim = simulator();
        assert_eq!(sim.place_vehicle(10.762622, 106.660172).unwrap(), 1);
        assert_eq!(sim.place_vehicle(10.77, 106.67).unwrap(), 2);

        let ids: Vec<u32> = sim.snapshot().unwrap().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_step_uses_injected_clock() {
        let sim = simulator();
        sim.place_vehicle(10.762622, 106.660172).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let summary = sim.step(&mut rng).unwrap();
        assert_eq!(summary.updated, 1);

        let vehicles = sim.snapshot().unwrap();
        let sentences = vehicles[0].sentences.as_ref().unwrap();
        let zda = decode_zda(&sentences.zda).unwrap();
        assert_eq!(zda.time.as_deref(), Some("183005"));
        assert_eq!(zda.date.as_deref(), Some("01/12/2024"));

        let gga = vehicles[0].latest_gga().unwrap();
        assert!((7..=11).contains(&gga.satellites.unwrap()));
        assert!((0.0..=2.0).contains(&gga.hdop.unwrap()));
    }

    #[test]
    fn test_subscribers_see_every_transition() {
        let sim = simulator();
        let mut rx = sim.subscribe();
        assert!(rx.borrow_and_update().is_empty());

        sim.place_vehicle(1.0, 2.0).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        let mut rng = StdRng::seed_from_u64(8);
        sim.step(&mut rng).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update()[0].sentences.is_some());
    }

    #[test]
    fn test_trail_bounded_after_many_steps() {
        let sim = simulator();
        sim.place_vehicle(0.0, 0.0).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            sim.step(&mut rng).unwrap();
        }
        assert!(sim.snapshot().unwrap().iter().all(|v| v.trail.len() <= 10));
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let sim = FleetSimulator::with_clock(
            Fleet::new(),
            Duration::from_millis(10),
            Arc::new(clock),
        );
        sim.place_vehicle(10.0, 106.0).unwrap();
        let mut rx = sim.subscribe();
        let _ = rx.borrow_and_update();

        let handle = sim.start().unwrap();
        assert!(sim.is_running());

        rx.changed().await.unwrap();
        assert!(rx.borrow().iter().all(|v| v.sentences.is_some()));

        sim.stop();
        handle.await.unwrap();
        assert!(!sim.is_running());
    }

    struct CountingClock(std::sync::atomic::AtomicUsize);

    impl Clock for CountingClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_keeps_single_cadence() {
        let clock = Arc::new(CountingClock(std::sync::atomic::AtomicUsize::new(0)));
        let sim = FleetSimulator::with_clock(
            Fleet::new(),
            Duration::from_millis(100),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        sim.place_vehicle(10.0, 106.0).unwrap();

        let first = sim.start().unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        sim.stop();
        let second = sim.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1010)).await;
        sim.stop();

        first.await.unwrap();
        second.await.unwrap();

        let ticks = clock.0.load(Ordering::SeqCst);
        assert!((9..=11).contains(&ticks), "ticks in ~1s at 100ms period = {}", ticks);
        assert!(!sim.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_replaces_run() {
        let sim = simulator();
        let first = sim.start().unwrap();
        let second = sim.start().unwrap();
        assert!(sim.is_running());

        // the first run exits at its next tick
        first.await.unwrap();
        assert!(sim.is_running());

        sim.stop();
        second.await.unwrap();
        assert!(!sim.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeded_runs_are_reproducible() {
        let run = |seed| async move {
            let sim = simulator();
            sim.place_vehicle(10.762622, 106.660172).unwrap();
            let mut rx = sim.subscribe();
            let _ = rx.borrow_and_update();

            let handle = sim.start_with_rng(StdRng::seed_from_u64(seed)).unwrap();
            rx.changed().await.unwrap();
            let sentences = rx.borrow_and_update()[0].sentences.clone();
            sim.stop();
            handle.await.unwrap();
            sentences
        };

        let a = run(17).await;
        let b = run(17).await;
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let sim = FleetSimulator::new(Fleet::new(), Duration::ZERO);
        assert_eq!(sim.period(), MIN_TICK_INTERVAL);
    }
}
