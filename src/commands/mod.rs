mod close_ticket;
mod create_ticket;
mod redeem_discount;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::helpers::command_def::{CommandDef, InteractionHandler};

pub const COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: create_ticket::CREATE_TICKET,
        builder: create_ticket::create_ticket_builder,
        handler: |c, i| Box::pin(async move { create_ticket::create_ticket(c, i).await }),
        re_register: true,
    },
    CommandDef {
        name: redeem_discount::REDEEM_DISCOUNT,
        builder: redeem_discount::redeem_discount_builder,
        handler: |c, i| Box::pin(async move { redeem_discount::redeem_discount(c, i).await }),
        re_register: true,
    },
    CommandDef {
        name: close_ticket::CLOSE_TICKET,
        builder: close_ticket::close_ticket_builder,
        handler: |c, i| Box::pin(async move { close_ticket::close_ticket(c, i).await }),
        re_register: true,
    },
];

static COMMAND_MAP: Lazy<DashMap<String, InteractionHandler>> = Lazy::new(|| {
    let map = DashMap::new();

    for cmd in COMMANDS {
        map.insert(cmd.name.to_string(), cmd.handler);
    }

    map
});

pub fn get_handler(command_name: &str) -> Option<InteractionHandler> {
    COMMAND_MAP
        .get(command_name)
        .as_ref()
        .map(|entry| *entry.value())
}
