use ornament_burst::{SceneConfig, Simulation, SimulationError};

fn main() -> Result<(), SimulationError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SceneConfig::load(&path) {
            Ok(config) => {
                tracing::info!(%path, "loaded config");
                config
            }
            Err(err) => {
                tracing::warn!(%path, %err, "falling back to default config");
                SceneConfig::default()
            }
        },
        None => SceneConfig::default(),
    };

    Simulation::new(config)?.run()
}
