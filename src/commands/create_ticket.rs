use evlog::meta;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::{ChannelType, PermissionOverwrite, PermissionOverwriteType};
use serenity::model::guild::Member;
use serenity::model::id::{GuildId, RoleId};
use serenity::model::permissions::Permissions;

use crate::handler::BotData;
use crate::helpers::command_resp;
use crate::runtime::get_logger;
use crate::tickets;

pub const CREATE_TICKET: &str = "create-ticket";

pub fn create_ticket_builder(cmd: &mut CreateApplicationCommand) -> &mut CreateApplicationCommand {
    cmd.name(CREATE_TICKET)
        .description("Open a private support ticket channel")
}

pub async fn create_ticket(ctx: Context, interaction: ApplicationCommandInteraction) -> anyhow::Result<()> {
    let guild_id = interaction.guild_id.unwrap();
    let member = interaction.member.as_ref().unwrap();
    let user_id = member.user.id;

    let data = ctx.data.read().await;
    let data = data.get::<BotData>().unwrap();

    if !data.creation_guard.try_claim(user_id) {
        get_logger().info("Ticket creation invoked while another is in flight for the same user.", meta! {
            "InteractionID" => interaction.id,
            "UserID" => user_id,
        });
        command_resp::reply_ephemeral(&ctx, &interaction, "Your ticket is already being set up; one moment.").await?;
        return Ok(());
    }

    let r = create_ticket_guarded(&ctx, &interaction, data, guild_id, member).await;
    data.creation_guard.release(user_id);
    r
}

async fn create_ticket_guarded(ctx: &Context, interaction: &ApplicationCommandInteraction, data: &BotData, guild_id: GuildId, member: &Member) -> anyhow::Result<()> {
    let user_id = member.user.id;

    let existing = match tickets::find_ticket_channel(ctx, guild_id, user_id).await {
        Ok(v) => v,
        Err(e) => {
            command_resp::reply_ephemeral(ctx, interaction, "Something went wrong while checking for an existing ticket.").await?;
            return Err(e.into());
        }
    };

    if let Some(channel) = existing {
        if data.deletions.cancel(channel.id) {
            get_logger().info("Pending deletion cancelled; ticket reopened.", meta! {
                "InteractionID" => interaction.id,
                "UserID" => user_id,
                "ChannelID" => channel.id,
            });
            command_resp::reply_ephemeral(ctx, interaction, format!(
                "Your ticket <#{}> was about to close and has been reopened.", channel.id.0
            )).await?;
        } else {
            command_resp::reply_ephemeral(ctx, interaction, format!(
                "You already have an open ticket: <#{}>.", channel.id.0
            )).await?;
        }
        return Ok(());
    }

    //

    let support_role = match tickets::find_support_role(ctx, guild_id, &data.config.support_role_name).await {
        Ok(v) => v,
        Err(e) => {
            command_resp::reply_ephemeral(ctx, interaction, "Something went wrong while preparing your ticket.").await?;
            return Err(e.into());
        }
    };

    if support_role.is_none() {
        get_logger().info("Support role not found in guild; ticket will only be visible to its owner.", meta! {
            "GuildID" => guild_id,
            "Role" => data.config.support_role_name,
        });
    }

    let member_allow = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::READ_MESSAGE_HISTORY;

    let mut permissions = vec![
        PermissionOverwrite {
            allow: Permissions::default(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(RoleId(guild_id.0)),
        },
        PermissionOverwrite {
            allow: member_allow,
            deny: Permissions::default(),
            kind: PermissionOverwriteType::Member(user_id),
        },
    ];

    if let Some(role_id) = support_role {
        permissions.push(PermissionOverwrite {
            allow: member_allow,
            deny: Permissions::default(),
            kind: PermissionOverwriteType::Role(role_id),
        });
    }

    //

    let display_name = member.display_name();
    let name = tickets::ticket_channel_name(&display_name);
    let topic = format!("Support ticket | {}", tickets::owner_marker(user_id));

    let channel = match guild_id.create_channel(&ctx.http, |c| {
        c.name(&name)
            .kind(ChannelType::Text)
            .topic(&topic)
            .permissions(permissions)
    }).await {
        Ok(v) => v,
        Err(e) => {
            get_logger().error_with_err("Failed to create ticket channel.", &e, None);
            command_resp::reply_ephemeral(ctx, interaction, "Something went wrong while creating your ticket; please try again later.").await?;
            return Err(e.into());
        }
    };

    get_logger().info("Ticket channel created.", meta! {
        "GuildID" => guild_id,
        "UserID" => user_id,
        "ChannelID" => channel.id,
        "Name" => name,
    });

    command_resp::reply_ephemeral(ctx, interaction, format!("Your ticket has been created: <#{}>.", channel.id.0)).await?;

    if let Err(e) = channel.id.say(&ctx.http, format!(
        "Hey <@{}>, welcome to your support ticket! A member of our support team will be with you shortly. \
        If you have a discount code, you can redeem it here with `/redeem-discount`.",
        user_id.0
    )).await {
        get_logger().error_with_err("Failed to send welcome message to new ticket channel.", &e, None);
    }

    Ok(())
}
