//! Profile editing for the Amiglot client
//!
//! A [`ProfileDraft`] is hydrated from `GET /profile` (or built from
//! defaults), validated on every change, and saved as three independent
//! writes followed by a refresh. Handle availability is checked in the
//! background with a debounce.

pub mod api;
pub mod editor;
pub mod error;
pub mod handle_check;
pub mod hydrate;
pub mod models;
pub mod normalize;
pub mod options;
pub mod save;
pub mod validation;

pub use api::{HttpProfileApi, ProfileApi};
pub use editor::ProfileEditor;
pub use error::{EditorError, EditorResult};
pub use handle_check::{HandleAvailability, HandleAvailabilityChecker, HandleLookup, HandleStatus};
pub use models::ProfileDraft;
pub use normalize::NormalizedProfile;
pub use save::{SaveError, SaveOutcome, SaveStep, run_save};
pub use validation::{FieldError, ProfileField, Section, ValidationReport};
