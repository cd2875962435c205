//! Component trait: the interface every UI panel implements.
//!
//! - Components receive `RenderState` read-only; only the engine changes it.
//! - Components produce `Vec<Action>` and never mutate shared state.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::Action;
use crate::render_state::RenderState;

pub trait Component {
    /// Handle a key event.  Returns actions to be dispatched.
    fn handle_key(&mut self, _key: KeyEvent, _state: &RenderState) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &RenderState);

    /// The minimum height required to render meaningfully.
    fn min_height(&self) -> u16 {
        3
    }
}
