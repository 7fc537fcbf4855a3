pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;

pub use crate::client::{Invalidate, JobReporter};
pub use crate::config::InvalidatorConfig;
pub use crate::error::{Error, Result, ServiceError};
pub use crate::event::{InvocationContext, InvocationEvent};
pub use crate::handler::{InvalidationHandler, InvalidationResponse, Outcome};

#[cfg(test)]
mod tests;
