//! Bulletin Notify
//!
//! Announces a newly stored event through up to two independent channels:
//!
//! - broadcast: one publish to a [`Topic`]
//! - direct: one rich email per confirmed subscriber through a [`Mailer`]
//!
//! Delivery is best-effort. A failure on one channel or one recipient is
//! logged and recorded in the [`FanoutReport`]; it never aborts the other
//! sends and never propagates to the caller.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod channel;
pub mod error;
pub mod fanout;
pub mod logging;
pub mod message;

pub use channel::{Mailer, OutgoingEmail, Topic};
pub use error::NotifyError;
pub use fanout::{BroadcastOutcome, DirectOutcome, FanoutReport, NotificationFanout, RecipientOutcome};
pub use logging::{LogMailer, LogTopic};
pub use message::EventNotice;
