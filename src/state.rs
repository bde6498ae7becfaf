//! Shared application state, built once at startup and cloned per request.

use crate::auth::JwtHandler;
use crate::directory::Directory;
use crate::ratings::RatingAggregator;
use crate::storage::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub jwt: Arc<JwtHandler>,
    pub ratings: Arc<RatingAggregator>,
    pub directory: Arc<Directory>,
}

impl AppState {
    pub fn new(db: Arc<Database>, jwt: Arc<JwtHandler>) -> Self {
        let ratings = Arc::new(RatingAggregator::new(db.clone()));
        let directory = Arc::new(Directory::new(db.clone(), ratings.clone()));
        Self {
            db,
            jwt,
            ratings,
            directory,
        }
    }
}
