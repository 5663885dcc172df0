use snaplabel_config::Config;

/// Startup configuration shared by the spawned tasks
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
