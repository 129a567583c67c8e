//! Request handling.
//!
//! [`Dispatcher`] takes a [`Request`](crate::entities::Request) through
//! prompt composition and the completion call, then hands the model output
//! to one of two flows:
//! - task creation for `analysis` requests
//! - report rendering for every other request type

mod dispatcher;
mod reports;
mod tasks;

pub use dispatcher::{Dispatcher, EMPTY_TEXT_MESSAGE};
pub(crate) use dispatcher::failure_envelope;
pub use reports::build_report;
pub use tasks::{create_tasks, MISSING_COLUMN_MESSAGE};
