pub mod appointment;
pub mod commitment;
pub mod slots;
pub mod time;

pub use appointment::*;
pub use commitment::*;
pub use slots::*;
pub use time::*;
