//! Market connector abstraction.
//!
//! - [`Connector`]: the venue interface the strategy consumes
//! - [`PaperConnector`]: in-memory venue for paper trading and tests
//! - Lifecycle event channel types shared by connectors

pub mod connector;
pub mod error;
pub mod paper;

pub use connector::{create_event_channel, Connector, EventReceiver, EventSender};
pub use error::{ConnectorError, ConnectorResult};
pub use paper::{PaperConfig, PaperConnector, PaperQuote};
