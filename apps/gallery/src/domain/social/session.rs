use super::ids::UserId;

/// The slice of the auth layer the engine needs.
#[cfg_attr(test, mockall::automock)]
pub trait Session: Send + Sync {
    /// Currently signed-in user, if any.
    fn user_id(&self) -> Option<UserId>;

    /// Called when an action needs a signed-in user and there is none.
    fn on_auth_required(&self);
}
