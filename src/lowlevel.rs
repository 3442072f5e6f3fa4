//! Low-level building blocks for custom retrieval pipelines.
//!
//! Most users should prefer [`Retriever`](crate::Retriever) and the top-level
//! retrieval functions.

pub use crate::candidate::topk::TopK;
pub use crate::reference::extract_window_with_context;
pub use crate::search::{select_window, SearchWindow, WindowParams};
