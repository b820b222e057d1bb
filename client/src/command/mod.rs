//! [`Command`] definition.

pub mod create_user;
pub mod delete_entity;
pub mod login;
pub mod logout;
pub mod refresh_session;
pub mod update_entity;

/// [`Command`] of the [`Client`].
///
/// [`Client`]: crate::Client
pub use common::Handler as Command;

pub use self::{
    create_user::CreateUser, delete_entity::DeleteEntity, login::Login,
    logout::Logout, refresh_session::RefreshSession,
    update_entity::UpdateEntity,
};
