use poise::CreateReply;
use shared::embeds::{error_embed, info_embed, succes_embed};

use super::parse_hex_color;
use crate::{Context, Error};

#[poise::command(slash_command)]
pub async fn info(
    ctx: Context<'_>,
    #[description = "Embed title"] title: String,
    #[description = "Embed body"] description: String,
    #[description = "Hex color (e.g. 3498db)"] color: Option<String>,
) -> Result<(), Error> {
    let logger = &ctx.data().logger;
    let user_id = ctx.author().id.get();

    let color = match color.as_deref().map(parse_hex_color).transpose() {
        Ok(color) => color,
        Err(e) => {
            logger.warn(format!("embed info: bad color user_id={user_id} err={e}"));
            return Err(e);
        }
    };

    logger.info(format!("embed info: invoked user_id={user_id}"));
    ctx.send(CreateReply::default().embed(info_embed(title, description, color).into()))
        .await?;

    Ok(())
}

#[poise::command(slash_command)]
pub async fn error(
    ctx: Context<'_>,
    #[description = "Embed title"] title: String,
    #[description = "Embed body"] description: String,
) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    ctx.data()
        .logger
        .info(format!("embed error: invoked user_id={user_id}"));

    ctx.send(CreateReply::default().embed(error_embed(title, description).into()))
        .await?;

    Ok(())
}

#[poise::command(slash_command)]
pub async fn success(
    ctx: Context<'_>,
    #[description = "Embed title"] title: String,
    #[description = "Embed body"] description: String,
) -> Result<(), Error> {
    let user_id = ctx.author().id.get();
    ctx.data()
        .logger
        .info(format!("embed success: invoked user_id={user_id}"));

    ctx.send(CreateReply::default().embed(succes_embed(title, description).into()))
        .await?;

    Ok(())
}
