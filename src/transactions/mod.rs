pub mod command;

pub use command::{CommandError, CommandRecord, CommandType};
