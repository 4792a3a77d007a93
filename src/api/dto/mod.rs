//! Data Transfer Objects for REST request/response serialization.
//!
//! Participant payloads carry both the stored digits and the masked
//! display form of tax ids and phone numbers.

pub mod auth_dto;
pub mod common_dto;
pub mod event_dto;
pub mod notification_dto;
pub mod participant_dto;

pub use auth_dto::*;
pub use common_dto::*;
pub use event_dto::*;
pub use notification_dto::*;
pub use participant_dto::*;
