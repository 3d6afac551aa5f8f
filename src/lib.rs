//! Client side of a stock prediction dashboard.
//!
//! A ticker goes to the prediction service, the reply is normalized into a
//! [`stock_api::PredictionResult`], indicators and a BUY/SELL/HOLD call are
//! derived from it, and the result is handed to a [`render::RenderTarget`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod stock_api;

pub use error::{AppError, Result};
