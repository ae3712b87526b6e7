//! Component trait - Interface for UI components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

use crate::action::Action;
use crate::store::Store;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// The pattern follows:
/// 1. `handle_key_event` - Convert key presses to Actions
/// 2. `update` - Process Actions and update state
/// 3. `draw` - Render the component
pub trait Component {
    /// Initialize the component
    ///
    /// Called once when the component is created.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Handle a key event, returning an optional Action
    ///
    /// Local edits (typing into a field, moving a cursor) happen here;
    /// anything that touches the store or the node comes back as an Action.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Update component state based on an Action
    ///
    /// Can return a follow-up Action for the App to process.
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Draw the component to the frame
    ///
    /// This method should be pure rendering - no state changes.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}

/// Key and label shown in the help bar
pub type KeyHint = (&'static str, &'static str);

/// A full-page component bound to a route
pub trait Screen: Component {
    /// Copy the store slices this screen renders; called after every dispatch
    fn sync(&mut self, store: &Store);

    /// Called when the screen becomes current
    fn on_enter(&mut self) {}

    /// Keys listed in the help bar while this screen is current
    fn hints(&self) -> Vec<KeyHint>;
}
