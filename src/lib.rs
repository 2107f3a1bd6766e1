//! Animated field of drifting dots joined by fading lines, drawn with nannou.

pub mod app;
pub mod config;
pub mod controls;
pub mod dots;
pub mod links;
pub mod motion;
pub mod random;
pub mod render;
pub mod scheduler;
pub mod simulation;
