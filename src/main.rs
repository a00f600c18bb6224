use crate::cli::run;

pub mod cli;
mod config;
pub mod domain;
pub mod pipeline;
pub mod storage;
pub mod tools;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    run()
}
