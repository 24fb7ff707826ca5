use meshview::{MeshViewApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    MeshViewApp::new(config)?.run()?;
    Ok(())
}
