pub mod prelude;

pub mod files;
