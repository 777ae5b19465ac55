use crate::domain::social::{Session, UserId};
use parking_lot::RwLock;

/// In-process [`Session`]: a replaceable user id plus the callback to run when
/// an action needs someone signed in (typically a redirect to the login page).
pub struct StaticSession {
    user: RwLock<Option<UserId>>,
    on_auth_required: Box<dyn Fn() + Send + Sync>,
}

impl StaticSession {
    pub fn new(user: Option<UserId>) -> Self {
        Self::with_callback(user, || tracing::info!("sign-in required"))
    }

    pub fn with_callback<F>(user: Option<UserId>, on_auth_required: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            user: RwLock::new(user),
            on_auth_required: Box::new(on_auth_required),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        *self.user.write() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

impl Session for StaticSession {
    fn user_id(&self) -> Option<UserId> {
        self.user.read().clone()
    }

    fn on_auth_required(&self) {
        (self.on_auth_required)();
    }
}
