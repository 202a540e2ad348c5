mod actions;
mod app;
mod config;
mod dom;
mod events;
mod geometry;
mod host;
mod input;
mod net;
mod publish;
mod render;
mod state;

pub use app::run;
