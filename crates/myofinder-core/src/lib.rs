pub mod channel;
pub mod config;
pub mod consts;
pub mod error;
pub mod ids;
pub mod input;
pub mod io;
pub mod markers;
pub mod notify;
pub mod render;
pub mod surface;
pub mod transform;
pub mod workspace;
