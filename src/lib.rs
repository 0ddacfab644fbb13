#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod cache;
pub mod config;
#[doc(hidden)]
pub mod diagnostics;
pub mod error;
pub mod gateway;
#[doc(hidden)]
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod stages;
pub mod text;

pub use config::Config;
pub use error::HumanizerError;
pub use pipeline::{ConversionRequest, ConversionResponse, Pipeline, Tone};
