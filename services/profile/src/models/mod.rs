//! Profile editor models
//!
//! `draft` holds the user-editable state, `wire` the request and response
//! bodies exchanged with the API.

pub mod draft;
pub mod wire;

// Re-export for convenience
pub use draft::{AvailabilitySlot, BirthField, LanguageEntry, ProfileDraft};
pub use wire::{
    AccountSummary, AvailabilityRecord, AvailabilityUpdate, HandleCheckResponse,
    LanguagePayload, LanguagesUpdate, ProfileRecord, ProfileResponse, ProfileUpdate,
};
