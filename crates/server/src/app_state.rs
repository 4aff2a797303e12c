use std::time::Duration;

use crate::api::ApiContext;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    /// Artificial latency applied to every hero request.
    pub(crate) response_delay: Duration,
}
