use crate::camera::{device_orientation_to_rotation, Camera};
use crate::platform::{OrientationEventSource, OrientationEvents};

/// Camera control that mirrors the physical orientation of the device.
///
/// Until the first sensor sample arrives the camera keeps its initial
/// rotation.
pub struct DeviceOrientationControl {
    source: OrientationEventSource,
    alpha_offset: f64,
}

impl DeviceOrientationControl {
    /// Attach to the platform orientation events, if any.
    #[must_use]
    pub fn new(events: Option<&dyn OrientationEvents>, alpha_offset: f64) -> Self {
        let mut source = OrientationEventSource::new();
        if let Some(events) = events {
            source.attach(events);
        }
        Self {
            source,
            alpha_offset,
        }
    }

    /// Whether sensor listeners are registered.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.source.is_attached()
    }

    /// Set the camera rotation from the latest sample.
    pub fn update(&self, camera: &mut Camera) {
        let reading = self.source.current();
        if let Some(sample) = reading.sample {
            camera.rotation = device_orientation_to_rotation(
                &sample,
                f64::from(reading.screen_orientation),
                self.alpha_offset,
            );
        }
    }

    /// Remove the sensor listeners.
    pub fn dispose(&mut self) {
        self.source.detach();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use glam::Quat;

    use super::*;
    use crate::camera::OrientationSample;
    use crate::options::CameraOptions;
    use crate::platform::{OrientationSink, Subscription};

    #[derive(Default)]
    struct TestBus {
        sink: RefCell<Option<OrientationSink>>,
    }

    impl OrientationEvents for TestBus {
        fn listen(&self, sink: OrientationSink) -> Option<Subscription> {
            *self.sink.borrow_mut() = Some(sink);
            Some(Subscription::new(|| {}))
        }
    }

    #[test]
    fn camera_frozen_until_first_sample() {
        let bus = TestBus::default();
        let control = DeviceOrientationControl::new(Some(&bus), 0.0);
        let mut camera = Camera::from_options(&CameraOptions::default());

        control.update(&mut camera);
        assert_eq!(camera.rotation, Quat::IDENTITY);

        let sample = OrientationSample::new(10.0, 80.0, -5.0);
        bus.sink.borrow().as_ref().unwrap().device_orientation(sample);
        control.update(&mut camera);
        assert_eq!(
            camera.rotation,
            device_orientation_to_rotation(&sample, 0.0, 0.0)
        );
    }

    #[test]
    fn dispose_detaches() {
        let bus = TestBus::default();
        let mut control = DeviceOrientationControl::new(Some(&bus), 0.0);
        assert!(control.is_attached());
        control.dispose();
        control.dispose();
        assert!(!control.is_attached());
    }
}
