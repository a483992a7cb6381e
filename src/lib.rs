//! Animated solar system for the terminal: an orbital motion model, an orbit
//! camera projecting it into character cells, and the control panel driving it.

pub mod app;
pub mod camera;
pub mod catalog;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod hud;
pub mod input;
pub mod logging;
pub mod model;
pub mod render;
pub mod scene;
pub mod starfield;
pub mod ui;
