//! Types and traits for recording training metrics.
//!
//! * [`Record`] - A container of key-value pairs of various data types
//! * [`RecordValue`] - Types of values that can be stored
//! * [`Recorder`] - Interface of telemetry sinks
//! * [`BufferedRecorder`] - A recorder that keeps records in memory
//!
//! # Basic Usage
//!
//! ```rust
//! use hadqn_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let num_games = 3;
//! let epsilon = 0.5f32;
//!
//! let mut record = Record::empty();
//! record.insert("num_games", RecordValue::Scalar(num_games as f32));
//! record.insert("epsilon", RecordValue::Scalar(epsilon));
//! assert_eq!(record.get_scalar("epsilon").unwrap(), 0.5);
//! ```
//!
//! [`Agent::print_info`](crate::Agent::print_info) produces a [`Record`] at the
//! end of reporting intervals and writes it to the attached [`Recorder`].
mod base;
mod buffered_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::Recorder;
