// Debug overlay text: last state change and current velocity

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;

use crate::game::fsm::FsmEvent;

/// Text a debug HUD would show for the player.
///
/// Subscribe `listener()` to the state machine; the overlay keeps the latest
/// change and renders it with whatever velocity it is given.
#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    label: Rc<RefCell<String>>,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state machine listener feeding this overlay
    pub fn listener(&self) -> impl FnMut(&FsmEvent) + 'static {
        let label = Rc::clone(&self.label);
        move |event| {
            if let FsmEvent::StateChanged { from, to, .. } = event {
                *label.borrow_mut() = format!("{} -> {}", from, to);
            }
        }
    }

    /// Latest state change, empty before the first one
    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn render(&self, velocity: Vec3) -> String {
        format!(
            "{} | velocity ({:.2}, {:.2}, {:.2}) {:.2} m/s",
            self.label.borrow(),
            velocity.x,
            velocity.y,
            velocity.z,
            velocity.length()
        )
    }
}
