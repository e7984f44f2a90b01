//! Simulation core of a vertical-scrolling arcade shooter.
//!
//! The crate owns the fixed-step update loop, entity lifecycles, collision
//! resolution and the menu / running / game-over state machine. Drawing and
//! input plumbing stay outside: the core reads [`input::InputEvent`]s, draws
//! through the [`surface::Surface`] trait and exposes a [`snapshot::Snapshot`]
//! per frame.

pub mod clock;
pub mod compute;
pub mod config;
pub mod director;
pub mod effects;
pub mod entities;
pub mod game;
pub mod geometry;
pub mod input;
pub mod leaderboard;
pub mod scene;
pub mod snapshot;
pub mod sprites;
pub mod surface;
pub mod world;
