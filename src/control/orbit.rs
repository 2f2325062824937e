use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::camera::Camera;
use crate::input::{InputEvent, MouseButton};
use crate::options::CameraOptions;

/// Frame length the damping factor is expressed against.
const NOMINAL_FRAME: Duration = Duration::from_millis(16);

/// Just short of straight up/down, so yaw stays well defined.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// Orbit camera driven by pointer drags and scroll.
///
/// Drags accumulate into a pending offset which `update` drains with
/// exponential damping, so motion eases out after the pointer stops.
pub struct OrbitControl {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,

    pending_rotation: Vec2,
    pending_zoom: f32,
    dragging: bool,
    last_cursor: Option<Vec2>,

    rotate_speed: f32,
    damping: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControl {
    /// Orbit around the origin at the configured distance.
    ///
    /// Non-finite distance settings take their defaults and reversed
    /// bounds are swapped.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        let defaults = CameraOptions::default();
        let a = finite_or(options.min_distance, defaults.min_distance);
        let b = finite_or(options.max_distance, defaults.max_distance);
        let (min_distance, max_distance) = (a.min(b), a.max(b));
        let distance = finite_or(options.distance, defaults.distance)
            .clamp(min_distance, max_distance);
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance,
            pending_rotation: Vec2::ZERO,
            pending_zoom: 0.0,
            dragging: false,
            last_cursor: None,
            rotate_speed: options.rotate_speed,
            damping: finite_or(options.damping, defaults.damping).clamp(0.01, 1.0),
            zoom_speed: options.zoom_speed,
            min_distance,
            max_distance,
        }
    }

    /// Current orbit rotation.
    #[must_use]
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Current distance from the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Track drag and scroll events. Returns `true` if consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                self.dragging = pressed;
                true
            }
            InputEvent::MouseButton { .. } => false,
            InputEvent::CursorMoved { x, y } => {
                let current = Vec2::new(x, y);
                if let (true, Some(last)) = (self.dragging, self.last_cursor) {
                    self.pending_rotation += current - last;
                }
                self.last_cursor = Some(current);
                self.dragging
            }
            InputEvent::Scroll { delta } => {
                self.pending_zoom += delta;
                true
            }
            InputEvent::PointerLeft => {
                let was_dragging = self.dragging;
                self.dragging = false;
                self.last_cursor = None;
                was_dragging
            }
        }
    }

    /// Apply the damped share of pending motion for a frame of `delta`
    /// and place the camera.
    pub fn update(&mut self, camera: &mut Camera, delta: Duration) {
        let frames = delta.as_secs_f32() / NOMINAL_FRAME.as_secs_f32();
        let share = 1.0 - (1.0 - self.damping).powf(frames.max(0.0));

        let step = self.pending_rotation * share;
        self.pending_rotation -= step;
        self.yaw += step.x * self.rotate_speed;
        self.pitch = (self.pitch + step.y * self.rotate_speed)
            .clamp(-MAX_PITCH, MAX_PITCH);

        let zoom = self.pending_zoom * share;
        self.pending_zoom -= zoom;
        self.distance = (self.distance * (1.0 - zoom * self.zoom_speed))
            .clamp(self.min_distance, self.max_distance);

        let orientation = self.orientation();
        camera.rotation = orientation;
        camera.position = self.target + orientation * Vec3::Z * self.distance;
    }

    /// Drop any in-progress drag.
    pub fn dispose(&mut self) {
        self.dragging = false;
        self.last_cursor = None;
        self.pending_rotation = Vec2::ZERO;
        self.pending_zoom = 0.0;
    }
}

fn finite_or(value: f32, default: f32) -> f32 {
    if value.is_finite() { value } else { default }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(control: &mut OrbitControl, from: Vec2, to: Vec2) {
        let _ = control.handle_input(&InputEvent::CursorMoved { x: from.x, y: from.y });
        let _ = control.handle_input(&InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        let _ = control.handle_input(&InputEvent::CursorMoved { x: to.x, y: to.y });
        let _ = control.handle_input(&InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
    }

    fn settle(control: &mut OrbitControl, camera: &mut Camera) {
        for _ in 0..200 {
            control.update(camera, NOMINAL_FRAME);
        }
    }

    #[test]
    fn camera_faces_target() {
        let options = CameraOptions::default();
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        drag(&mut control, Vec2::ZERO, Vec2::new(120.0, 40.0));
        settle(&mut control, &mut camera);

        let to_target = (Vec3::ZERO - camera.position).normalize();
        assert!(camera.forward().abs_diff_eq(to_target, 1e-5));
        assert!((camera.position.length() - options.distance).abs() < 1e-4);
    }

    #[test]
    fn drag_right_turns_view_left() {
        let options = CameraOptions::default();
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        drag(&mut control, Vec2::ZERO, Vec2::new(100.0, 0.0));
        settle(&mut control, &mut camera);
        assert!(camera.forward().x < 0.0);
    }

    #[test]
    fn motion_is_damped_across_frames() {
        let options = CameraOptions::default();
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        drag(&mut control, Vec2::ZERO, Vec2::new(100.0, 0.0));

        control.update(&mut camera, NOMINAL_FRAME);
        let first = control.yaw;
        settle(&mut control, &mut camera);
        let total = control.yaw;

        assert!((first - total * options.damping).abs() < 1e-5);
        assert!((total - 100.0 * options.rotate_speed).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let options = CameraOptions::default();
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        drag(&mut control, Vec2::ZERO, Vec2::new(0.0, 10_000.0));
        settle(&mut control, &mut camera);
        assert!(control.pitch <= MAX_PITCH);
    }

    #[test]
    fn moves_without_button_do_not_rotate() {
        let options = CameraOptions::default();
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        assert!(!control.handle_input(&InputEvent::CursorMoved { x: 0.0, y: 0.0 }));
        assert!(!control.handle_input(&InputEvent::CursorMoved { x: 50.0, y: 0.0 }));
        settle(&mut control, &mut camera);
        assert_eq!(control.yaw, 0.0);
    }

    #[test]
    fn leaving_the_surface_ends_the_drag() {
        let options = CameraOptions::default();
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        let _ = control.handle_input(&InputEvent::CursorMoved { x: 0.0, y: 0.0 });
        let _ = control.handle_input(&InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert!(control.handle_input(&InputEvent::PointerLeft));
        assert!(!control.handle_input(&InputEvent::PointerLeft));

        // Re-entering without a press does not resume rotation.
        let _ = control.handle_input(&InputEvent::CursorMoved { x: 80.0, y: 0.0 });
        let _ = control.handle_input(&InputEvent::CursorMoved { x: 160.0, y: 0.0 });
        settle(&mut control, &mut camera);
        assert_eq!(control.yaw, 0.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let options = CameraOptions::default();
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        assert!(control.handle_input(&InputEvent::Scroll { delta: 1_000.0 }));
        settle(&mut control, &mut camera);
        assert!(control.distance() >= options.min_distance);
        assert!(control.distance() <= options.max_distance);
    }

    #[test]
    fn reversed_distance_bounds_are_swapped() {
        let options = CameraOptions {
            distance: 1.0,
            min_distance: 20.0,
            max_distance: 10.0,
            ..CameraOptions::default()
        };
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        assert_eq!(control.distance(), 10.0);
        assert!(control.handle_input(&InputEvent::Scroll { delta: -1_000.0 }));
        settle(&mut control, &mut camera);
        assert!((10.0..=20.0).contains(&control.distance()));
    }

    #[test]
    fn non_finite_distances_use_defaults() {
        let options = CameraOptions {
            distance: f32::NAN,
            min_distance: f32::NAN,
            max_distance: f32::INFINITY,
            ..CameraOptions::default()
        };
        let mut control = OrbitControl::new(&options);
        let mut camera = Camera::from_options(&options);
        assert_eq!(control.distance(), CameraOptions::default().distance);
        assert!(control.handle_input(&InputEvent::Scroll { delta: 1_000.0 }));
        settle(&mut control, &mut camera);
        assert!(camera.position.is_finite());
        assert!((0.1..=15.0).contains(&control.distance()));
    }
}
