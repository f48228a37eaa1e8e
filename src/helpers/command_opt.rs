use serenity::client::Context;
use serenity::model::application::interaction::application_command::{ApplicationCommandInteraction, CommandDataOption, CommandDataOptionValue};

use crate::helpers::command_resp;

pub fn find_string_opt(options: &[CommandDataOption], name: &str) -> Option<String> {
    options.iter()
        .find(|v| v.name == name)
        .and_then(|v| v.resolved.as_ref())
        .and_then(|v| match v {
            CommandDataOptionValue::String(s) => Some(s.clone()),
            _ => None,
        })
}

// Reports the missing option to the invoker before erroring, so a surviving
// Ok always carries Some.
pub async fn find_required<T>(
    ctx: &Context,
    interaction: &ApplicationCommandInteraction,
    options: &[CommandDataOption],
    finder: fn(&[CommandDataOption], &str) -> Option<T>,
    name: &str,
) -> anyhow::Result<Option<T>> {
    match finder(options, name) {
        Some(v) => Ok(Some(v)),
        None => {
            command_resp::reply_ephemeral(ctx, interaction, format!("Required option '{}' was not provided.", name)).await?;
            Err(anyhow::anyhow!("required option '{}' was not provided", name))
        }
    }
}
