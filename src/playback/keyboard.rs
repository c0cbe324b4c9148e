use std::str::FromStr;

use crate::foundation::error::GeostoryError;

/// Keys the timeline responds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Previous event.
    ArrowLeft,
    /// Next event.
    ArrowRight,
    /// Next event.
    ArrowUp,
    /// Previous event.
    ArrowDown,
    /// First event.
    Home,
    /// Decorative message.
    End,
    /// Toggle autoplay.
    Space,
}

impl FromStr for Key {
    type Err = GeostoryError;

    /// Accepts DOM `KeyboardEvent.key` names; space is `" "` or `"Space"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            " " | "Space" => Self::Space,
            other => return Err(GeostoryError::validation(format!("unbound key '{other}'"))),
        })
    }
}

/// Where keyboard focus is when a key arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyContext {
    /// A text field has focus.
    pub text_input_focused: bool,
    /// A modal dialog is open.
    pub modal_visible: bool,
}

/// What a key does to the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Step one event back.
    StepBackward,
    /// Step one event forward.
    StepForward,
    /// Stop autoplay and go to the first event.
    JumpToStart,
    /// Start or stop autoplay.
    TogglePlay,
    /// Show a decorative overlay message.
    DecorativeMessage,
}

/// Map a key to its timeline action, or `None` when the context swallows it.
pub fn action_for(key: Key, ctx: KeyContext) -> Option<KeyAction> {
    if ctx.text_input_focused || ctx.modal_visible {
        return None;
    }
    Some(match key {
        Key::ArrowLeft | Key::ArrowDown => KeyAction::StepBackward,
        Key::ArrowRight | Key::ArrowUp => KeyAction::StepForward,
        Key::Home => KeyAction::JumpToStart,
        Key::Space => KeyAction::TogglePlay,
        Key::End => KeyAction::DecorativeMessage,
    })
}
