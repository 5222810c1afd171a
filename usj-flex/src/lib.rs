//! usj-flex - Scripture to interlinear text bridge
//!
//! Converts USJ scripture trees into paragraphs of writing-system tagged
//! runs and stores them as texts in a target project. Scripture content is
//! tagged vernacular; structural markup (markers, numbers, references) is
//! tagged analysis so it stays out of interlinear glossing.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod assembler;
pub mod bridge;
pub mod config;
pub mod converter;
pub mod filter;
pub mod markers;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod text_run;
pub mod usj;
