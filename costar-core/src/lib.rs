pub mod backend;
pub mod config;
pub mod model;
pub mod reducer;
pub mod render;
pub mod selection;
pub mod state;
pub mod submission;
pub mod text;
