use shared::{BaseConfig, Logger};

pub mod command;
pub mod config;

pub struct Data {
    pub base: BaseConfig,
    pub logger: Logger,
}

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, Data, Error>;
