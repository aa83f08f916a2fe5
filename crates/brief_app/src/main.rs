mod cli;
mod effects;
mod export;
mod input;
mod logging;
mod render;
mod session;

fn main() -> anyhow::Result<()> {
    cli::run()
}
