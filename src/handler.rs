use std::collections::HashMap;

use evlog::meta;
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::application::interaction::Interaction;
use serenity::model::guild::Guild;
use serenity::model::id::GuildId;
use serenity::prelude::TypeMapKey;

use crate::commands;
use crate::discount::DiscountCodes;
use crate::helpers::command_resp;
use crate::runtime::get_logger;
use crate::tickets::deletion::DeletionScheduler;
use crate::tickets::CreationGuard;

pub struct BotConfig {
    pub guild_id: GuildId,
    pub support_role_name: String,
    pub discount_codes: DiscountCodes,
}

pub struct BotData {
    pub config: BotConfig,
    pub deletions: DeletionScheduler,
    pub creation_guard: CreationGuard,
}

impl BotData {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            deletions: DeletionScheduler::new(),
            creation_guard: CreationGuard::new(),
        }
    }
}

impl TypeMapKey for BotData {
    type Value = BotData;
}

pub struct BotHandler {}

#[async_trait]
impl EventHandler for BotHandler {
    async fn guild_create(&self, ctx: Context, guild: Guild, _is_new: bool) {
        get_logger().info("Guild ready.", meta![
            "ID" => guild.id,
            "Name" => guild.name,
        ]);

        let data = ctx.data.read().await;
        let data = data.get::<BotData>().unwrap();

        if guild.id != data.config.guild_id {
            get_logger().debug("Guild is not the configured support guild.", meta! {
                "GuildID" => guild.id,
                "GuildName" => guild.name,
            });
            return;
        }

        let existing_cmds = match guild.id.get_application_commands(&ctx.http).await {
            Ok(v) => v,
            Err(e) => {
                get_logger().error_with_err("Failed to fetch registered commands.", &e, None);
                return;
            }
        };

        let existing_map = existing_cmds.iter()
            .map(|v| (v.name.clone(), v))
            .collect::<HashMap<_, _>>();

        for cmd in commands::COMMANDS {
            if existing_map.contains_key(cmd.name) {
                if !cmd.re_register {
                    get_logger().debug("Command already registered in this server.", meta! {
                        "GuildID" => guild.id,
                        "GuildName" => guild.name,
                        "Command" => cmd.name
                    });
                    continue;
                }
            }

            let created = match guild.id.create_application_command(&ctx.http, |c| {
                (cmd.builder)(c)
            }).await {
                Ok(v) => v,
                Err(e) => {
                    get_logger().error_with_err("Failed to register command in server.", &e, None);
                    continue;
                }
            };

            get_logger().debug("Registered command in server.", meta! {
                "GuildID" => guild.id,
                "GuildName" => guild.name,
                "Command" => cmd.name,
                "ID" => created.id
            });
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let interaction = match interaction {
            Interaction::ApplicationCommand(v) => v,
            _ => return,
        };

        get_logger().info("Interaction received.", meta! {
            "InteractionID" => interaction.id,
            "CommandID" => interaction.data.id,
            "CommandName" => interaction.data.name
        });

        if interaction.guild_id.is_none() {
            if let Err(e) = command_resp::reply_ephemeral(&ctx, &interaction, "This command can only be used inside a server.").await {
                get_logger().error("Failed to reject interaction without guild context.", meta! {
                    "InteractionID" => interaction.id,
                    "Error" => e,
                });
            }
            return;
        }

        let handler = match commands::get_handler(&interaction.data.name) {
            None => return,
            Some(v) => v,
        };

        let interaction_id = interaction.id;
        let command_id = interaction.data.id;
        let command_name = interaction.data.name.clone();

        let r: anyhow::Result<()> = handler(ctx, interaction).await;
        match r {
            Ok(()) => {}
            Err(e) => {
                get_logger().error("Error occurred in interaction processor.", meta! {
                    "InteractionID" => interaction_id,
                    "CommandID" => command_id,
                    "CommandName" => command_name,
                    "Error" => e,
                });
            }
        }
    }
}
