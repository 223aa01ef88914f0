//! Model module - Application state and data types
//!
//! The remote-derived state lives in `crate::store`; this module holds what
//! only the client knows about:
//!
//! - `types`: screens, focus and the UI state
//! - `forms`: form state and validation
//! - `filters`: application filter / search query state
//! - `app_model`: the context object tying stores and UI state together

mod types;
mod forms;
mod filters;
mod app_model;

pub use types::{ActiveSection, Dialog, Screen, UiState};

pub use forms::{Form, OtpForm, ProfileForm, ResetPasswordForm, COUNTRY_FIELD, PROFILE_FIELDS};

pub use app_model::{AppModel, ViewSnapshot};
