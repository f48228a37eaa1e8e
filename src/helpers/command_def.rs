use futures::future::BoxFuture;
use serenity::builder::CreateApplicationCommand;
use serenity::client::Context;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;

pub type InteractionHandler = fn(Context, ApplicationCommandInteraction) -> BoxFuture<'static, anyhow::Result<()>>;

pub struct CommandDef {
    pub name: &'static str,
    pub builder: fn(&mut CreateApplicationCommand) -> &mut CreateApplicationCommand,
    pub handler: InteractionHandler,
    pub re_register: bool,
}
