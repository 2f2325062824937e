//! Start/stop and the per-frame tick.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{EnvironmentController, State, FRAME_DELTA};

impl EnvironmentController {
    /// Begin the frame loop. Calling it while running does nothing.
    pub fn start(&self) {
        let generation = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                log::debug!("start ignored: environment disposed");
                return;
            }
            if state.running {
                return;
            }
            state.running = true;
            state.loop_generation += 1;
            state.loop_generation
        };
        log::debug!("frame loop {generation} started");
        schedule_frame(&self.state, generation);
    }

    /// Halt the frame loop. A callback already scheduled still fires but
    /// draws nothing.
    pub fn stop(&self) {
        self.state.borrow_mut().stop();
    }

    /// Run one frame synchronously: deliver finished image loads, advance
    /// the control and particles by one step and draw. Works whether or
    /// not the loop is running; does nothing after `dispose`.
    pub fn render_frame(&self) {
        if self.state.borrow().disposed {
            return;
        }
        pump_loads(&self.state);
        self.state.borrow_mut().tick();
    }
}

impl State {
    pub(super) fn stop(&mut self) {
        if self.running {
            log::debug!("frame loop {} stopped", self.loop_generation);
        }
        self.running = false;
    }

    fn is_current_loop(&self, generation: u64) -> bool {
        self.running && !self.disposed && self.loop_generation == generation
    }

    /// Advance and draw one frame. Render failures are logged; the loop
    /// keeps going.
    fn tick(&mut self) {
        if self.disposed {
            return;
        }
        self.control.update(&mut self.camera, FRAME_DELTA);
        if let Some(particles) = self.scene.particles_mut() {
            particles.update(FRAME_DELTA);
        }
        if let Err(e) = self.renderer.render(&self.scene, &self.camera) {
            log::error!("frame render failed: {e}");
        }
    }
}

fn schedule_frame(state: &Rc<RefCell<State>>, generation: u64) {
    let weak = Rc::downgrade(state);
    let scheduler = Rc::clone(&state.borrow().scheduler);
    scheduler.schedule_next_frame(Box::new(move || on_frame(&weak, generation)));
}

fn on_frame(weak: &Weak<RefCell<State>>, generation: u64) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    if !state.borrow().is_current_loop(generation) {
        return;
    }

    // Completions may call `stop` or `dispose` from user callbacks.
    pump_loads(&state);
    {
        let mut current = state.borrow_mut();
        if !current.is_current_loop(generation) {
            return;
        }
        current.tick();
    }
    schedule_frame(&state, generation);
}

/// Deliver finished image loads with no borrow held, since completions
/// borrow the state themselves.
fn pump_loads(state: &Rc<RefCell<State>>) {
    let loader = Rc::clone(&state.borrow().loader);
    let delivered = loader.pump();
    if delivered > 0 {
        log::debug!("delivered {delivered} image load(s)");
    }
}
