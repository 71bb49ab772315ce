// Template catalog and style resolution. Pure data, no I/O.

pub mod handlers;
pub mod registry;
pub mod styles;
