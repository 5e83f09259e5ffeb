//! Delivery of alerts to chat channels.
//!
//! The [`ChannelTransport`] trait is the seam between the alerting core and the
//! network; [`HttpTransport`] is the production implementation.
pub mod transport;

pub use transport::{ChannelTransport, HttpTransport, DEFAULT_TIMEOUT};
