#![cfg_attr(not(test), no_std)]

//! Board-independent control logic for the word clock.

pub mod app;
pub mod config;
pub mod input;
pub mod network;
pub mod render;
pub mod settings;
pub mod time;
pub mod wordclock;
