pub mod config;
pub mod consts;
pub mod coords;
pub mod crop;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod io;
pub mod viewer;
pub mod viewport;
