use std::time::Duration;

use anyhow::{Context as _, Result};
use bot::{Data, command::embed::embed_command, config::Config};
use poise::{Framework, FrameworkOptions};
use serenity::all::{ActivityData, ClientBuilder, GatewayIntents};
use shared::setup_logger;

const BOT_NAME: &str = "starter";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load(BOT_NAME)?;
    let logger = setup_logger(BOT_NAME).context("failed to set up logging")?;

    logger.info(format!(
        "starting version={} environment={}",
        config.version,
        config.base.environment()
    ));

    let intents = GatewayIntents::non_privileged();
    let commands = vec![embed_command()];

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands,
            ..Default::default()
        })
        .setup({
            let config = config.clone();
            let logger = logger.clone();

            move |ctx, ready, framework| {
                Box::pin(async move {
                    logger.info(format!(
                        "{} [{}] connected successfully!",
                        ready.user.name, ready.user.id
                    ));

                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                    let ctx_clone = ctx.clone();
                    let status = config.clone();
                    tokio::spawn(async move {
                        let period = Duration::from_secs(status.settings.status_interval_secs.max(1));
                        let mut tick = tokio::time::interval(period);
                        let mut n: usize = 0;

                        loop {
                            tick.tick().await;
                            ctx_clone.set_activity(Some(ActivityData::custom(status.status_text(n))));
                            n = n.wrapping_add(1);
                        }
                    });

                    Ok(Data {
                        base: config.base,
                        logger,
                    })
                })
            }
        })
        .build();

    let mut client = ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .context("failed to create Discord client")?;

    let client_logger = logger.clone();
    tokio::spawn(async move {
        if let Err(why) = client.start().await {
            client_logger.error(format!("Client error: {why:?}"));
        }
    });

    shutdown_signal().await;

    logger.info("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
