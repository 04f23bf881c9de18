use poise::CreateReply;
use shared::embeds::{RssArticle, rss_article_embed};

use crate::{Context, Error};

#[poise::command(slash_command)]
pub async fn article(
    ctx: Context<'_>,
    #[description = "Feed name (tech, webdev, ai, crypto)"] feed: String,
    #[description = "Article title"] title: Option<String>,
    #[description = "Article link"] link: Option<String>,
    #[description = "Article summary"] summary: Option<String>,
    #[description = "Publication date"] published: Option<String>,
) -> Result<(), Error> {
    let logger = &ctx.data().logger;
    let user_id = ctx.author().id.get();

    logger.info(format!(
        "embed article: invoked user_id={user_id} feed={feed}"
    ));

    let article = RssArticle {
        title,
        link,
        summary,
        published,
    };
    logger.debug(format!("embed article: rendering {article:?}"));

    ctx.send(CreateReply::default().embed(rss_article_embed(&article, &feed).into()))
        .await?;

    Ok(())
}
