// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goban CLI - interactive text front end for the Go board engine

pub mod commands;
pub mod config;
pub mod render;
