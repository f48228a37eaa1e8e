use evlog::meta;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;

use crate::handler::BotData;
use crate::helpers::command_resp;
use crate::runtime::get_logger;
use crate::tickets;
use crate::tickets::deletion::DELETE_DELAY;

pub const CLOSE_TICKET: &str = "close-ticket";

pub fn close_ticket_builder(cmd: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    cmd.name(CLOSE_TICKET)
        .description("Close this support ticket")
}

pub async fn close_ticket(ctx: Context, interaction: ApplicationCommandInteraction) -> anyhow::Result<()> {
    let guild_id = interaction.guild_id.unwrap();
    let member = interaction.member.as_ref().unwrap();
    let channel_id = interaction.channel_id;

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
        get_logger().info("Unauthorized ticket closure attempt.", meta! {
            "InteractionID" => interaction.id,
            "ChannelID" => channel_id,
            "UserID" => member.user.id,
        });
        command_resp::reply_ephemeral(&ctx, &interaction, "Only the ticket owner or the support team can close this ticket.").await?;
        return Ok(());
    }

    //

    match command_resp::reply_public(&ctx, &interaction, "This ticket will be closed in 5 seconds.").await {
        Ok(()) => {}
        Err(e) => {
            // Best-effort; the channel may already be gone.
            if let Err(e2) = command_resp::reply_ephemeral(&ctx, &interaction, "Something went wrong while closing this ticket.").await {
                get_logger().error("Failed to send closure failure notice.", meta! {
                    "InteractionID" => interaction.id,
                    "ChannelID" => channel_id,
                    "Error" => e2,
                });
            }
            return Err(e);
        }
    }

    let http = ctx.http.clone();
    data.deletions.schedule(channel_id, DELETE_DELAY, async move {
        match channel_id.delete(&http).await {
            Ok(_) => {
                get_logger().info("Ticket channel deleted.", meta! {
                    "ChannelID" => channel_id,
                });
            }
            Err(e) => {
                get_logger().error_with_err("Failed to delete ticket channel; it may already be gone.", &e, None);
            }
        }
    });

    get_logger().info("Ticket closure scheduled.", meta! {
        "InteractionID" => interaction.id,
        "ChannelID" => channel_id,
        "UserID" => member.user.id,
    });

    Ok(())
}
