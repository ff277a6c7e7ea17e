pub mod session;
pub mod slide;

pub use session::{NavDirection, PresentationSession};
pub use slide::Slide;
