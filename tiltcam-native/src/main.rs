mod app;
mod input;
mod scene;
mod settings;

use std::path::PathBuf;

fn main() -> anyhow::Result<()>
{
  // RUST_LOG overrides this; tiltcam_core=trace shows per-frame poses.
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,tiltcam_core=debug")).init();

  let path = std::env::args_os().nth(1).map(PathBuf::from);
  let settings = settings::load(path.as_deref())?;

  app::run(settings)
}
