pub mod align;
pub mod blend;
pub mod consts;
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
