use std::env;

use evlog::{meta, LogEventConsolePrinter, Logger};
use serenity::model::id::GuildId;
use serenity::prelude::GatewayIntents;
use serenity::Client;

use crate::discount::DiscountCodes;
use crate::handler::{BotConfig, BotData, BotHandler};
use crate::runtime::{get_logger, set_logger};

mod commands;
mod discount;
mod handler;
mod helpers;
mod runtime;
mod tickets;

const DEFAULT_SUPPORT_ROLE: &str = "Support";
const DEFAULT_CODES: &[&str] = &["ILLEGAL10", "WELCOME5"];

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let appl: u64 = env::var("TICKETDESK_APPL").expect("expected TICKETDESK_APPL").parse().expect("application ID is invalid");
    let token = env::var("TICKETDESK_TOKEN").expect("expected TICKETDESK_TOKEN");
    let guild: u64 = env::var("TICKETDESK_GUILD").expect("expected TICKETDESK_GUILD").parse().expect("guild ID is invalid");
    let support_role = env::var("TICKETDESK_SUPPORT_ROLE").unwrap_or_else(|_| DEFAULT_SUPPORT_ROLE.to_owned());

    let mut logger = Logger::default();
    logger.register(LogEventConsolePrinter::default());
    set_logger(logger);

    let codes = match env::var("TICKETDESK_CODES") {
        Ok(v) => DiscountCodes::parse_list(&v),
        Err(_) => DiscountCodes::new(DEFAULT_CODES.iter().copied()),
    };

    get_logger().info("Discount allow-set loaded.", meta! {
        "Count" => codes.len(),
    });

    let data = BotData::new(BotConfig {
        guild_id: GuildId(guild),
        support_role_name: support_role,
        discount_codes: codes,
    });

    let mut client = Client::builder(&token, GatewayIntents::GUILDS)
        .event_handler(BotHandler {})
        .application_id(appl)
        .await
        .unwrap_or_else(|e| {
            get_logger().error_with_err("Client initialization error.", &e, None);
            panic!("{}", e)
        });
    client.data.write().await.insert::<BotData>(data);

    if let Err(e) = client.start().await {
        get_logger().error_with_err("Client error.", e, None);
    }
}
