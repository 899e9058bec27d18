// SPDX-License-Identifier: MIT OR Apache-2.0

//! versegrep - Semantic verse search library
//!
//! Shared modules for the versegrep CLI tool.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod fetch;
pub mod format;
pub mod output;
pub mod registry;
pub mod search;
pub mod setup;
pub mod store;
