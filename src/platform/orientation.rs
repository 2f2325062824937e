use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::camera::OrientationSample;

/// Latest orientation state seen by an [`OrientationEventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationReading {
    /// Last device sample, `None` until the first sensor event arrives.
    pub sample: Option<OrientationSample>,
    /// Screen rotation in degrees (0, 90, 180, 270 or -90).
    pub screen_orientation: i32,
}

/// Write side of the orientation holder, handed to platform listeners.
///
/// Each event overwrites the previous value; nothing is queued.
#[derive(Clone, Default)]
pub struct OrientationSink {
    reading: Rc<Cell<OrientationReading>>,
}

impl OrientationSink {
    /// Record a device-orientation event.
    pub fn device_orientation(&self, sample: OrientationSample) {
        let mut reading = self.reading.get();
        reading.sample = Some(sample);
        self.reading.set(reading);
    }

    /// Record a screen-rotation event. Platforms that expose no angle pass
    /// `None`, which is stored as 0.
    pub fn screen_rotation(&self, angle: Option<i32>) {
        let mut reading = self.reading.get();
        reading.screen_orientation = angle.unwrap_or(0);
        self.reading.set(reading);
    }
}

/// Handle that removes platform listeners when dropped.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the closure that removes the registered listeners.
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// Platform event bus for screen-rotation and device-orientation events.
pub trait OrientationEvents {
    /// Register both listeners, forwarding events into `sink`.
    ///
    /// Returns `None` when the host has no context to attach to.
    fn listen(&self, sink: OrientationSink) -> Option<Subscription>;
}

/// Owned subscription to orientation events plus a pollable holder of the
/// latest values.
///
/// Listener lifetime is tied to this object: [`detach`](Self::detach) or
/// dropping it removes them.
#[derive(Default)]
pub struct OrientationEventSource {
    sink: OrientationSink,
    subscription: Option<Subscription>,
}

impl OrientationEventSource {
    /// Create a detached source with no sample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register listeners on the platform bus. No-op if already attached or
    /// if the platform cannot attach.
    pub fn attach(&mut self, events: &dyn OrientationEvents) {
        if self.subscription.is_some() {
            return;
        }
        self.subscription = events.listen(self.sink.clone());
        if self.subscription.is_none() {
            log::debug!("orientation events unavailable, source stays detached");
        }
    }

    /// Remove both listeners. Safe to call repeatedly or when never
    /// attached.
    pub fn detach(&mut self) {
        drop(self.subscription.take());
    }

    /// Whether listeners are currently registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Latest stored sample and screen rotation.
    #[must_use]
    pub fn current(&self) -> OrientationReading {
        self.sink.reading.get()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Bus that hands out its sink and counts live listeners.
    #[derive(Default)]
    struct TestBus {
        sink: RefCell<Option<OrientationSink>>,
        listeners: Rc<Cell<u32>>,
        available: bool,
    }

    impl OrientationEvents for TestBus {
        fn listen(&self, sink: OrientationSink) -> Option<Subscription> {
            if !self.available {
                return None;
            }
            *self.sink.borrow_mut() = Some(sink);
            self.listeners.set(self.listeners.get() + 2);
            let listeners = Rc::clone(&self.listeners);
            Some(Subscription::new(move || {
                listeners.set(listeners.get() - 2);
            }))
        }
    }

    fn available_bus() -> TestBus {
        TestBus {
            available: true,
            ..TestBus::default()
        }
    }

    #[test]
    fn no_sample_before_first_event() {
        let source = OrientationEventSource::new();
        assert_eq!(source.current(), OrientationReading::default());
        assert!(source.current().sample.is_none());
    }

    #[test]
    fn last_sample_wins() {
        let bus = available_bus();
        let mut source = OrientationEventSource::new();
        source.attach(&bus);

        let sink = bus.sink.borrow().clone().unwrap();
        sink.device_orientation(OrientationSample::new(1.0, 2.0, 3.0));
        sink.device_orientation(OrientationSample::new(4.0, 5.0, 6.0));
        sink.screen_rotation(Some(90));

        let reading = source.current();
        assert_eq!(reading.sample, Some(OrientationSample::new(4.0, 5.0, 6.0)));
        assert_eq!(reading.screen_orientation, 90);
    }

    #[test]
    fn missing_screen_angle_defaults_to_zero() {
        let bus = available_bus();
        let mut source = OrientationEventSource::new();
        source.attach(&bus);

        let sink = bus.sink.borrow().clone().unwrap();
        sink.screen_rotation(Some(270));
        sink.screen_rotation(None);
        assert_eq!(source.current().screen_orientation, 0);
    }

    #[test]
    fn detach_is_idempotent_and_removes_listeners() {
        let bus = available_bus();
        let mut source = OrientationEventSource::new();
        source.detach();

        source.attach(&bus);
        source.attach(&bus);
        assert_eq!(bus.listeners.get(), 2);

        source.detach();
        source.detach();
        assert_eq!(bus.listeners.get(), 0);
        assert!(!source.is_attached());
    }

    #[test]
    fn drop_removes_listeners() {
        let bus = available_bus();
        {
            let mut source = OrientationEventSource::new();
            source.attach(&bus);
            assert_eq!(bus.listeners.get(), 2);
        }
        assert_eq!(bus.listeners.get(), 0);
    }

    #[test]
    fn unavailable_platform_is_a_no_op() {
        let bus = TestBus::default();
        let mut source = OrientationEventSource::new();
        source.attach(&bus);
        assert!(!source.is_attached());
        source.detach();
    }
}
