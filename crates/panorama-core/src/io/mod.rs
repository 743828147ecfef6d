pub mod cleanup;
pub mod image_io;
