use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// A one-shot callback run on the next frame.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Schedules callbacks for the next display frame.
///
/// Browsers back this with `requestAnimationFrame`; native viewers and tests
/// use [`ManualScheduler`] and decide when a frame happens.
pub trait FrameScheduler {
    /// Run `callback` once, on the next frame, after the current call stack
    /// has returned.
    fn schedule_next_frame(&self, callback: FrameCallback);
}

/// Scheduler whose frames are fired explicitly with
/// [`run_pending`](Self::run_pending).
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<FrameCallback>>,
    scheduled: Cell<usize>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next frame.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Total callbacks ever scheduled.
    #[must_use]
    pub fn total_scheduled(&self) -> usize {
        self.scheduled.get()
    }

    /// Fire one frame: run every callback queued before this call. Callbacks
    /// scheduled while running wait for the next frame. Returns how many
    /// ran.
    pub fn run_pending(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let count = batch.len();
        for callback in batch {
            callback();
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_next_frame(&self, callback: FrameCallback) {
        self.queue.borrow_mut().push_back(callback);
        self.scheduled.set(self.scheduled.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn callbacks_run_only_when_fired() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        scheduler.schedule_next_frame(Box::new(move || h.set(h.get() + 1)));

        assert_eq!(hits.get(), 0);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.run_pending(), 0);
    }

    #[test]
    fn rescheduled_callbacks_wait_for_next_frame() {
        let scheduler = Rc::new(ManualScheduler::new());
        let s = Rc::clone(&scheduler);
        scheduler.schedule_next_frame(Box::new(move || {
            s.schedule_next_frame(Box::new(|| {}));
        }));

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.total_scheduled(), 2);
    }
}
