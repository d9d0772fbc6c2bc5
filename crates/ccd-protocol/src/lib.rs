//! Wire protocol for the CCD booking API.
//!
//! This crate defines what travels between the client and the content
//! server:
//!
//! - **Payloads** ([`LoginRequest`], [`LoginResponse`], [`LoginStatus`],
//!   [`MenuItem`], [`BookingFormData`], [`EventSubmission`]).
//! - **Classification** ([`StatusClass`]): the only view of HTTP status
//!   codes the rest of the client branches on.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how payloads become
//!   bytes and back.
//! - **Endpoints** ([`endpoints`]): every path the client calls.
//!
//! ```text
//! Transport (bytes) → Protocol (payloads) → Session (identity)
//! ```

mod auth;
mod booking;
mod codec;
pub mod endpoints;
mod error;
mod menu;
mod status;

pub use auth::{CurrentUser, LoginRequest, LoginResponse, LoginStatus, deserialize_uid};
pub use booking::{
    BookingFormData, DEFAULT_EVENT_COST, DEFAULT_LOCATION_TEXT,
    DEFAULT_LOCATION_URL, EventSubmission, Nid, Talent, TalentKind,
    TalentOption,
};
pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use menu::MenuItem;
pub use status::{NETWORK_FAILURE_CODE, StatusClass};
