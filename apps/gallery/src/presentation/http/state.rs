use crate::{config::Config, domain::social::repository::SocialRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub social_repo: Arc<dyn SocialRepository>,
}
