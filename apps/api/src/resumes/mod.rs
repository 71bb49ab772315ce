// Resume lifecycle, reads (document, preview) and section writes.

pub mod handlers;
pub mod lifecycle;
pub mod preview;
pub mod sections;
