//! Self-rescheduling frame loop.
//!
//! [`FrameScheduler`] keeps one persistent callback and hands it back to the
//! [`FrameHost`] after every successful draw step, until [`stop`] is called or
//! a step fails. A failed or panicking step ends the loop; it is never retried.
//!
//! [`stop`]: FrameScheduler::stop

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{error, warn};

use crate::env::{FrameCallback, FrameHandle, FrameHost};
use crate::error::BackdropError;

/// Work done once per frame, given the frame timestamp in milliseconds.
pub type DrawStep = Box<dyn FnMut(f64) -> Result<(), BackdropError>>;

pub struct FrameScheduler<H: FrameHost> {
    inner: Rc<Inner<H>>,
}

struct Inner<H: FrameHost> {
    host: H,

    /// The user step. Taken out when the loop stops so captured state is released.
    step: RefCell<Option<DrawStep>>,

    /// The callback registered with the host each frame. It only holds a weak
    /// reference back to `Inner`, so the host never keeps the loop alive.
    tick: RefCell<Option<FrameCallback>>,

    running: Cell<bool>,

    /// The frame requested but not yet delivered.
    pending: Cell<Option<FrameHandle>>,

    frames: Cell<u64>,
}

impl<H: FrameHost + 'static> FrameScheduler<H> {
    /// A scheduler that is **not yet running**.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                step: RefCell::new(None),
                tick: RefCell::new(None),
                running: Cell::new(false),
                pending: Cell::new(None),
                frames: Cell::new(0),
            }),
        }
    }

    /// Begin calling `step` once per frame.
    ///
    /// Starting a running scheduler is a no-op. Fails only if the host refuses
    /// the first frame request, in which case the scheduler stays stopped.
    pub fn start(
        &self,
        step: impl FnMut(f64) -> Result<(), BackdropError> + 'static,
    ) -> Result<(), BackdropError> {
        if self.inner.running.get() {
            warn!("frame scheduler already running; ignoring start");
            return Ok(());
        }

        let weak = Rc::downgrade(&self.inner);
        let tick: FrameCallback = Rc::new(move |timestamp_ms| {
            if let Some(inner) = weak.upgrade() {
                inner.tick(timestamp_ms);
            }
        });
        *self.inner.step.borrow_mut() = Some(Box::new(step));
        *self.inner.tick.borrow_mut() = Some(tick);
        self.inner.running.set(true);

        if let Err(err) = self.inner.schedule() {
            self.inner.halt();
            return Err(err);
        }
        Ok(())
    }

    /// Stop the loop and cancel the pending frame. Nothing fires after this returns.
    pub fn stop(&self) {
        self.inner.halt();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Draw steps completed successfully since construction.
    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.inner.frames.get()
    }
}

impl<H: FrameHost> Inner<H> {
    fn schedule(&self) -> Result<(), BackdropError> {
        let tick = self
            .tick
            .borrow()
            .clone()
            .ok_or_else(|| BackdropError::fault("frame callback released"))?;
        let handle = self.host.request_frame(tick)?;
        self.pending.set(Some(handle));
        Ok(())
    }

    fn tick(&self, timestamp_ms: f64) {
        if !self.running.get() {
            return;
        }
        self.pending.set(None);

        let result = {
            let _guard = HaltOnPanic(&self.running);
            match self.step.try_borrow_mut() {
                Ok(mut step) => match step.as_mut() {
                    Some(step) => step(timestamp_ms),
                    None => return,
                },
                Err(_) => Err(BackdropError::fault("draw step re-entered")),
            }
        };

        match result {
            Ok(()) => {
                self.frames.set(self.frames.get() + 1);
                if !self.running.get() {
                    // Stopped from inside the step.
                    self.release();
                } else if let Err(err) = self.schedule() {
                    error!(%err, "could not request next frame; stopping frame loop");
                    self.halt();
                }
            }
            Err(err) => {
                error!(%err, frame = self.frames.get(), "draw step failed; stopping frame loop");
                self.halt();
            }
        }
    }

    fn halt(&self) {
        self.running.set(false);
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
        self.release();
    }

    fn release(&self) {
        // Still borrowed when called from inside the step; `tick` drops it afterwards.
        if let Ok(mut step) = self.step.try_borrow_mut() {
            step.take();
        }
        self.tick.borrow_mut().take();
    }
}

impl<H: FrameHost> Drop for FrameScheduler<H> {
    fn drop(&mut self) {
        self.inner.halt();
    }
}

impl<H: FrameHost> fmt::Debug for FrameScheduler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("running", &self.inner.running.get())
            .field("pending", &self.inner.pending.get())
            .field("frames", &self.inner.frames.get())
            .finish()
    }
}

/// Marks the loop stopped if the step unwinds, so a panicking step reads as
/// a dead loop rather than a running one with nothing scheduled.
struct HaltOnPanic<'a>(&'a Cell<bool>);

impl Drop for HaltOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.set(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::ManualEnvironment;

    fn env() -> Rc<ManualEnvironment> {
        Rc::new(ManualEnvironment::new(800.0, 600.0))
    }

    #[test]
    fn runs_once_per_frame_until_stopped() {
        let env = env();
        let scheduler = FrameScheduler::new(Rc::clone(&env));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        scheduler
            .start(move |ts| {
                log.borrow_mut().push(ts);
                Ok(())
            })
            .unwrap();

        assert_eq!(env.pending_frames(), 1);
        assert_eq!(env.run_frames(3), 3);
        assert_eq!(*seen.borrow(), vec![16.0, 32.0, 48.0]);
        assert_eq!(scheduler.frames_drawn(), 3);

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(env.pending_frames(), 0);
        assert_eq!(env.frames_cancelled(), 1);
        assert_eq!(env.run_frames(5), 0);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn failing_step_stops_the_loop() {
        let env = env();
        let scheduler = FrameScheduler::new(Rc::clone(&env));
        let mut calls = 0;
        scheduler
            .start(move |_| {
                calls += 1;
                if calls == 2 {
                    Err(BackdropError::fault("boom"))
                } else {
                    Ok(())
                }
            })
            .unwrap();

        assert_eq!(env.run_frames(10), 2);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.frames_drawn(), 1);
        assert_eq!(env.pending_frames(), 0);
    }

    #[test]
    fn refused_first_frame_leaves_it_stopped() {
        let env = env();
        env.refuse_frames();
        let scheduler = FrameScheduler::new(Rc::clone(&env));
        let err = scheduler.start(|_| Ok(())).unwrap_err();
        assert!(matches!(err, BackdropError::EnvironmentUnavailable(_)));
        assert!(!scheduler.is_running());
        assert_eq!(env.pending_frames(), 0);
        assert_eq!(env.run_frames(3), 0);
    }

    #[test]
    fn second_start_is_ignored() {
        let env = env();
        let scheduler = FrameScheduler::new(Rc::clone(&env));
        scheduler.start(|_| Ok(())).unwrap();
        scheduler.start(|_| Err(BackdropError::fault("never runs"))).unwrap();
        assert_eq!(env.pending_frames(), 1);
        env.run_frames(2);
        assert!(scheduler.is_running());
    }

    #[test]
    fn step_may_stop_its_own_loop() {
        let env = env();
        let scheduler = Rc::new(FrameScheduler::new(Rc::clone(&env)));
        let handle = Rc::downgrade(&scheduler);
        scheduler
            .start(move |_| {
                if let Some(s) = handle.upgrade() {
                    s.stop();
                }
                Ok(())
            })
            .unwrap();

        assert_eq!(env.run_frames(3), 1);
        assert!(!scheduler.is_running());
        assert_eq!(env.pending_frames(), 0);
    }

    #[test]
    fn dropping_cancels_the_pending_frame() {
        let env = env();
        let scheduler = FrameScheduler::new(Rc::clone(&env));
        scheduler.start(|_| Ok(())).unwrap();
        drop(scheduler);
        assert_eq!(env.pending_frames(), 0);
        assert_eq!(env.run_frames(1), 0);
    }

    #[test]
    fn panicking_step_leaves_the_loop_stopped() {
        let env = env();
        let scheduler = FrameScheduler::new(Rc::clone(&env));
        scheduler.start(|_| panic!("step exploded")).unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| env.run_frame()));
        assert!(result.is_err());
        assert!(!scheduler.is_running());
        assert_eq!(env.pending_frames(), 0);
    }
}
