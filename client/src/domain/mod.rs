//! Domain definitions.

pub mod feedback;
pub mod group;
pub mod movie;
pub mod post;
pub mod resource;
pub mod user;

pub use self::{
    feedback::Feedback, group::Group, movie::Movie, post::Post,
    resource::Resource, user::User,
};
