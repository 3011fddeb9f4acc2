use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::{config::Config, record::SurveyRecord};

pub struct AppState {
    pub config: Config,
    pub record: RwLock<SurveyRecord>,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let record = if config.seed_defaults {
            info!("Seeding record with a dry week");
            SurveyRecord::seeded()
        } else {
            SurveyRecord::empty()
        };

        Arc::new(Self {
            config,
            record: RwLock::new(record),
        })
    }
}
