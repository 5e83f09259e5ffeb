//! The alerting core: policy, re-entrancy guards and dispatch.
//!
//! A record enters through [`crate::AlertLogger::on_record`], is evaluated by
//! the [`AlertPolicy`] on the caller's thread, and, when an alert fires, is
//! handed to the [`Dispatcher`] which delivers it on a detached task.
pub mod dispatcher;
pub mod guard;
pub mod policy;

pub use dispatcher::Dispatcher;
pub use policy::{AlertPolicy, DispatchTask};
