//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod pg_care;
mod pg_error;
mod pg_identity;
mod pg_messaging;

pub use http_error::{Error, ErrorKind, Result};
