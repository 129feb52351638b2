use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDate};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
}

impl AppState {
    /// Every write goes through this guard, so writers are serialized.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))
    }

    /// The server's local calendar date.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
