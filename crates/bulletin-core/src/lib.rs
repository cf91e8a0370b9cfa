//! Bulletin Core
//!
//! Request handling for the campus bulletin:
//!
//! - [`EventHandler`]: store an event, then announce it to subscribers
//! - [`RegistrationHandler`]: record one registration per attendee and event
//! - [`SubscriptionHandler`]: add a newsletter subscriber
//!
//! All three run the same [`AppendPipeline`] over a blob-backed
//! [`DocumentStore`](bulletin_store::DocumentStore). Writes are
//! read-modify-write with last-writer-wins semantics.
//!
//! # Example
//!
//! ```rust,ignore
//! use bulletin_core::prelude::*;
//!
//! let config = BulletinConfig::from_env()?;
//! let services = Services::from_config(&config, blobs, Transports::new());
//! let handlers = Handlers::new(Arc::new(services));
//!
//! let response = handlers.subscriptions.handle(&ApiRequest::post(r#"{"email":"a@b.com"}"#)).await;
//! assert_eq!(response.status_code, 200);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod services;

pub use config::BulletinConfig;
pub use error::{ConfigError, ConflictError, HandlerError};
pub use handler::{
    parse_body, ApiRequest, ApiResponse, EventHandler, Handler, Handlers, RegistrationHandler,
    SubscriptionHandler,
};
pub use pipeline::{check, AppendPipeline, Checked, EventKind, RecordKind, RegistrationKind, SubscriberKind};
pub use services::{Services, Transports};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for wiring and invoking handlers
pub mod prelude {
    pub use crate::{
        ApiRequest, ApiResponse, BulletinConfig, Handler, HandlerError, Handlers, Services,
        Transports,
    };
}
