use serenity::client::Context;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;

pub async fn reply_ephemeral(ctx: &Context, interaction: &ApplicationCommandInteraction, content: impl ToString) -> anyhow::Result<()> {
    interaction.create_interaction_response(&ctx.http, |r| {
        r.kind(InteractionResponseType::ChannelMessageWithSource)
            .interaction_response_data(|d| d.content(content).ephemeral(true))
    }).await?;

    Ok(())
}

pub async fn reply_public(ctx: &Context, interaction: &ApplicationCommandInteraction, content: impl ToString) -> anyhow::Result<()> {
    interaction.create_interaction_response(&ctx.http, |r| {
        r.kind(InteractionResponseType::ChannelMessageWithSource)
            .interaction_response_data(|d| d.content(content))
    }).await?;

    Ok(())
}
