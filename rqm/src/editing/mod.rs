//! MusicBrainz editing helpers
//!
//! Builds the HTTP calls behind the MusicBrainz edit forms and submits them
//! through a [`RequestManager`](crate::scheduler::RequestManager) so the
//! server never sees more than one request per rate interval.
//!
//! Responses are handed back raw; interpreting them is up to the caller.

mod client;
mod editor;
mod error;
pub mod mbid;
mod params;
pub mod query;
pub mod referential;
mod request;

pub use client::{EditTransport, HttpEditClient, RawResponse};
pub use editor::Editor;
pub use error::EditError;
pub use params::FormParams;
pub use request::{EditBatch, EditOptions, EditRequest, EditSpec, Method};
