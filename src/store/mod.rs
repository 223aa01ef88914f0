//! Store module - observable state backed by the API
//!
//! - `core`: the generic store, fetch-and-cache action and request guard
//! - `toast`: notification queue shared by every store
//! - `session`: session-scoped snapshots on disk
//! - one module per concrete store

mod core;
mod toast;
mod session;
mod auth;
mod stat;
mod music;
mod user;
mod player;
mod chat;

pub use self::core::{Revision, StoreContext, StoreStatus};
pub use toast::{Toast, ToastKind, Toasts};
pub use session::SessionStorage;

pub use auth::{AuthState, AuthStore};
pub use stat::{StatState, StatStore};
pub use music::{MusicState, MusicStore};
pub use user::{UserState, UserStore};
pub use player::{PlayerState, PlayerStore};
pub use chat::{Activity, ChatState, ChatStore};
