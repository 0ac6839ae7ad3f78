pub mod worker;

pub use worker::Workers;
