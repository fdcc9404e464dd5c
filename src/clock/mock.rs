use super::Clock;
use crate::lib::*;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::thread::{JoinHandle, ThreadId};
use tracing::debug;

/// A virtual clock for deterministic tests of code that waits.
///
/// The mock clock reports [`Duration`]s since its creation and never
/// advances on its own. Threads that [`sleep`](#method.sleep) on it
/// are parked at a *breakpoint* (their wake-up instant) until a
/// controlling thread moves time forward with [`set`](#method.set),
/// [`add`](#method.add) or [`wait_for_all`](#method.wait_for_all).
///
/// # Controlled threads
///
/// To know when it is safe to move time forward, the clock needs to
/// know which threads are currently running. Every thread that sleeps
/// on the clock must therefore be started with
/// [`spawn`](#method.spawn); sleeping on any other thread panics.
///
/// Before time advances, the controller waits until each controlled
/// thread has either finished or gone to sleep. After releasing a
/// breakpoint, it again waits until every woken thread is done
/// reacting to it, so no thread ever observes a time later than the
/// one it was woken for.
///
/// # Controller discipline
///
/// `set`, `add` and `wait_for_all` must only ever be called from a
/// single thread that is not itself controlled by the clock. Calling
/// them from a controlled thread, or from a second thread while
/// another call is still in progress, panics.
///
/// # Example
/// ```
/// # use std::time::Duration;
/// use interval_gate::clock::{Clock, MockClock};
///
/// let clock = MockClock::default();
/// let c = clock.clone();
/// let sleeper = clock.spawn(move || {
///     c.sleep(Duration::from_secs(3));
///     c.now()
/// });
/// clock.add(Duration::from_secs(5));
/// assert_eq!(Duration::from_secs(3), sleeper.join().unwrap());
/// assert_eq!(Duration::from_secs(5), clock.now());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<State>,

    // Signalled when a breakpoint is released.
    released: Condvar,

    // Signalled when a controlled thread stops running.
    quiet: Condvar,
}

#[derive(Debug, Default)]
struct State {
    now: Duration,

    // Wake-up instant => number of threads sleeping until then.
    breakpoints: BTreeMap<Duration, usize>,

    // Controlled threads that are running, i.e. neither sleeping nor finished.
    live: usize,

    // Threads released from a breakpoint that haven't resumed yet.
    waking: usize,

    threads: HashSet<ThreadId>,

    // A controller operation is in progress.
    controlling: bool,
}

impl State {
    fn is_quiet(&self) -> bool {
        self.live == 0 && self.waking == 0
    }

    fn sleepers(&self) -> usize {
        self.breakpoints.values().sum()
    }

    fn first_breakpoint(&self) -> Option<Duration> {
        self.breakpoints.keys().next().copied()
    }
}

/// Decrements the live count of a controlled thread when it
/// finishes, whether by returning or by unwinding.
struct Exit<'a> {
    shared: &'a Shared,
}

impl<'a> Drop for Exit<'a> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.threads.remove(&thread::current().id());
        state.live -= 1;
        if state.is_quiet() {
            self.shared.quiet.notify_all();
        }
    }
}

/// Exclusive access for one controller operation. Hands the clock
/// back to the next controller when dropped, including on panic.
struct Control<'a> {
    state: MutexGuard<'a, State>,
}

impl<'a> Drop for Control<'a> {
    fn drop(&mut self) {
        self.state.controlling = false;
    }
}

impl MockClock {
    /// Runs `f` on a new thread controlled by this clock.
    ///
    /// The thread counts as running from the moment `spawn` is
    /// called, so a subsequent [`set`](#method.set) waits for it to
    /// reach its first sleep (or to finish).
    pub fn spawn<F, T>(&self, f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.shared.state.lock().live += 1;
        let shared = self.shared.clone();
        thread::spawn(move || {
            shared.state.lock().threads.insert(thread::current().id());
            let _exit = Exit { shared: &shared };
            f()
        })
    }

    /// Moves the clock forward to `target`, waking every thread whose
    /// breakpoint lies at or before `target` in order.
    ///
    /// # Panics
    /// Panics if `target` lies before the current time.
    /// See also the [controller discipline](#controller-discipline).
    pub fn set(&self, target: Duration) {
        let mut control = self.control();
        self.advance(&mut control.state, target);
    }

    /// Moves the clock forward by `by`. See [`set`](#method.set).
    ///
    /// # Panics
    /// Panics if the resulting time can not be represented.
    pub fn add(&self, by: Duration) {
        let mut control = self.control();
        let target = match control.state.now.checked_add(by) {
            Some(target) => target,
            None => panic!(
                "can not move the mock clock from {:?} by {:?}: overflow",
                control.state.now, by
            ),
        };
        self.advance(&mut control.state, target);
    }

    /// Releases breakpoints one after another until no controlled
    /// thread is sleeping on the clock anymore and all of them have
    /// finished or are sleeping. The clock ends at the last
    /// breakpoint it released.
    pub fn wait_for_all(&self) {
        let mut control = self.control();
        let state = &mut control.state;
        self.settle(state);
        loop {
            let next = state.first_breakpoint();
            match next {
                Some(at) => self.release(state, at),
                None => break,
            }
        }
    }

    /// Returns the number of threads sleeping on the clock.
    pub fn sleepers(&self) -> usize {
        self.shared.state.lock().sleepers()
    }

    /// Returns the number of distinct instants that sleeping threads
    /// are waiting for.
    pub fn breakpoints(&self) -> usize {
        self.shared.state.lock().breakpoints.len()
    }

    /// Returns the number of controlled threads that are currently
    /// running (or about to resume from a breakpoint).
    pub fn live_threads(&self) -> usize {
        let state = self.shared.state.lock();
        state.live + state.waking
    }

    fn control(&self) -> Control<'_> {
        let mut state = self.shared.state.lock();
        assert!(
            !state.threads.contains(&thread::current().id()),
            "threads started with MockClock::spawn can not move the mock clock"
        );
        assert!(
            !state.controlling,
            "the mock clock is already being moved by a concurrent controller"
        );
        state.controlling = true;
        Control { state }
    }

    fn advance(&self, state: &mut MutexGuard<State>, target: Duration) {
        assert!(
            target >= state.now,
            "can not move the mock clock backwards from {:?} to {:?}",
            state.now,
            target
        );
        self.settle(state);
        loop {
            let next = state.first_breakpoint();
            match next {
                Some(at) if at <= target => self.release(state, at),
                _ => break,
            }
        }
        state.now = target;
    }

    fn settle(&self, state: &mut MutexGuard<State>) {
        while !state.is_quiet() {
            self.shared.quiet.wait(state);
        }
    }

    fn release(&self, state: &mut MutexGuard<State>, at: Duration) {
        let sleepers = state.breakpoints.remove(&at).unwrap_or(0);
        debug!(?at, sleepers, "releasing breakpoint");
        state.now = at;
        state.waking += sleepers;
        self.shared.released.notify_all();
        self.settle(state);
    }
}

impl Clock for MockClock {
    type Instant = Duration;

    fn now(&self) -> Duration {
        self.shared.state.lock().now
    }

    /// Parks the calling thread until the clock has been moved to
    /// `duration` from now. Sleeping for zero returns immediately.
    ///
    /// # Panics
    /// Panics if the calling thread was not started with
    /// [`MockClock::spawn`], or if the wake-up time can not be
    /// represented.
    fn sleep(&self, duration: Duration) {
        let mut state = self.shared.state.lock();
        assert!(
            state.threads.contains(&thread::current().id()),
            "only threads started with MockClock::spawn may sleep on a mock clock"
        );
        if duration == Duration::new(0, 0) {
            return;
        }
        let wake_at = match state.now.checked_add(duration) {
            Some(at) => at,
            None => panic!(
                "can not sleep on the mock clock from {:?} for {:?}: overflow",
                state.now, duration
            ),
        };
        *state.breakpoints.entry(wake_at).or_insert(0) += 1;
        state.live -= 1;
        if state.is_quiet() {
            self.shared.quiet.notify_all();
        }

        // The controller never moves past a breakpoint without
        // releasing it, so reaching `wake_at` means we were released.
        while state.now < wake_at {
            self.shared.released.wait(&mut state);
        }
        state.waking -= 1;
        state.live += 1;
    }
}
