use anyhow::Context;
use desk_scene::app;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = app::parse_args(&args)?;
    log::debug!("{invocation:?}");
    app::run(invocation).context("desk-scene failed")?;
    Ok(())
}
