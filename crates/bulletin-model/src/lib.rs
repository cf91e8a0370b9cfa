//! Bulletin Model
//!
//! The record kinds stored by Bulletin and the pure rules applied to them:
//!
//! - [`Event`], [`Subscriber`], [`Registration`]: canonical stored shapes
//! - [`EventDraft`], [`SubscriberDraft`], [`RegistrationDraft`]: decoded request bodies
//! - [`validation`]: required-field, email and calendar-date checks
//! - [`dedup`]: per-kind collision rules
//! - [`RecordFactory`]: identifier and timestamp assignment
//!
//! # Example
//!
//! ```rust,ignore
//! use bulletin_model::{validation, EventDraft, RecordFactory};
//!
//! let draft: EventDraft = serde_json::from_str(body)?;
//! validation::validate_event(&draft)?;
//! let event = RecordFactory::new().event(draft);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod dedup;
pub mod error;
pub mod factory;
pub mod record;
pub mod validation;

pub use error::ValidationError;
pub use factory::{Clock, IdScheme, RecordFactory, SystemClock};
pub use record::{
    Event, EventDraft, Registration, RegistrationDraft, Subscriber, SubscriberDraft,
    SubscriberStatus,
};

/// Common imports for working with records
pub mod prelude {
    pub use crate::{
        Event, EventDraft, RecordFactory, Registration, RegistrationDraft, Subscriber,
        SubscriberDraft, SubscriberStatus, ValidationError,
    };
}
