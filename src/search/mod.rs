//! Search window selection.
//!
//! The window is the ordered set of frames, before the query frame, that a
//! retrieval looks at. See [`select_window`].

mod window;

pub use window::{select_window, SearchWindow, WindowParams};
