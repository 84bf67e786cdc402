#![no_std]

//! ESP32-S3 board adapters for the word clock: buttons, flash settings, display, LED matrix.

pub mod input;
pub mod render;
pub mod storage;
