pub mod engine;

pub use engine::{Mixer, UserHandle};
