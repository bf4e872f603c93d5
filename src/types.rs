use crate::picture::LoadedPicture;
use crossterm::event::{KeyEvent, MouseEvent};

/// How a delivery attempt against the frame ended. Only the status class of
/// the response is inspected, never the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The frame answered with a success status.
    Delivered,
    /// The frame answered with an error status.
    Rejected,
    /// The request never completed.
    Unreachable,
}

#[derive(Debug, Clone)]
pub enum Action {
    Error(String),
    Quit,
    Tick(usize),
    Render,
    NextFocus,
    PrevFocus,
    PromptDone(SendOutcome),
    PictureLoaded(u32, Box<Result<LoadedPicture, String>>),
    PictureSent(SendOutcome),
    Health(bool),
}

#[derive(Debug, Clone)]
pub enum Event {
    Tick(usize),
    Render,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Error(String),
}
