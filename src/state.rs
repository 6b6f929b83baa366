use std::sync::Arc;

use chrono_tz::Tz;
use tokio::sync::Mutex;

use notical_core::CalendarStore;

use crate::extract::Extractor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CalendarStore>,
    pub extractor: Arc<dyn Extractor>,
    pub tz: Tz,
    /// Serializes every load-mutate-save cycle on the calendar document, so
    /// concurrent add/delete requests cannot lose each other's writes.
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<CalendarStore>, extractor: Arc<dyn Extractor>, tz: Tz) -> Self {
        AppState {
            store,
            extractor,
            tz,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}
