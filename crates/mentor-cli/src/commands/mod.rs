pub mod chat;
pub mod credential;
pub mod normalize;
pub mod reconcile;
pub mod show;
