use evlog::meta;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;

use crate::handler::BotData;
use crate::helpers::{command_opt, command_resp};
use crate::runtime::get_logger;
use crate::tickets;

pub const REDEEM_DISCOUNT: &str = "redeem-discount";

pub fn redeem_discount_builder(cmd: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    cmd.name(REDEEM_DISCOUNT)
        .description("Redeem a discount code in your support ticket")
        .create_option(|opt| opt
            .name("code")
            .description("The discount code to redeem")
            .required(true)
            .kind(CommandOptionType::String))
}

pub async fn redeem_discount(ctx: Context, interaction: ApplicationCommandInteraction) -> anyhow::Result<()> {
    let guild_id = interaction.guild_id.unwrap();
    let member = interaction.member.as_ref().unwrap();
    let channel_id = interaction.channel_id;

    let code = command_opt::find_required(&ctx, &interaction, &interaction.data.options, command_opt::find_string_opt, "code").await?.unwrap();

    let data = ctx.data.read().await;
    let data = data.get::<BotData>().unwrap();

    //

    let authorized = match tickets::member_may_act(&ctx, guild_id, channel_id, member, &data.config.support_role_name).await {
        Ok(v) => v,
        Err(e) => {
            command_resp::reply_ephemeral(&ctx, &interaction, "Something went wrong while checking this channel.").await?;
            return Err(e.into());
        }
    };

    if !authorized {
        get_logger().info("Unauthorized discount redemption attempt.", meta! {
            "InteractionID" => interaction.id,
            "ChannelID" => channel_id,
            "UserID" => member.user.id,
        });
        command_resp::reply_ephemeral(&ctx, &interaction, "Only the ticket owner or the support team can redeem a code here.").await?;
        return Ok(());
    }

    //

    if data.config.discount_codes.is_valid(&code) {
        get_logger().info("Discount code redeemed.", meta! {
            "InteractionID" => interaction.id,
            "ChannelID" => channel_id,
            "UserID" => member.user.id,
        });
        command_resp::reply_public(&ctx, &interaction, format!("Discount code **{}** is valid!", code)).await?;
    } else {
        command_resp::reply_ephemeral(&ctx, &interaction, format!("Discount code '{}' is invalid or has expired.", code)).await?;
    }

    Ok(())
}
