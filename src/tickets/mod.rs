pub mod deletion;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serenity::client::Context;
use serenity::model::channel::{Channel, GuildChannel};
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId, RoleId, UserId};

// The marker must survive verbatim in the channel topic; it is the only
// association between a ticket channel and its owner.
pub const OWNER_MARKER_PREFIX: &str = "TicketOwnerID:";

pub const CHANNEL_NAME_PREFIX: &str = "ticket-";

pub fn owner_marker(user_id: UserId) -> String {
    format!("{}{}", OWNER_MARKER_PREFIX, user_id.0)
}

pub fn parse_owner(topic: &str) -> Option<UserId> {
    let start = topic.find(OWNER_MARKER_PREFIX)? + OWNER_MARKER_PREFIX.len();
    let digits = topic[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>();

    if digits.is_empty() {
        return None;
    }

    digits.parse::<u64>().ok().map(UserId)
}

pub fn channel_owner(channel: &GuildChannel) -> Option<UserId> {
    channel.topic.as_deref().and_then(parse_owner)
}

pub fn ticket_channel_name(display_name: &str) -> String {
    format!("{}{}", CHANNEL_NAME_PREFIX, display_name.to_lowercase())
}

pub fn may_act_on_ticket(owner: Option<UserId>, invoker: UserId, member_roles: &[RoleId], support_role: Option<RoleId>) -> bool {
    if owner == Some(invoker) {
        return true;
    }

    match support_role {
        Some(role_id) => member_roles.contains(&role_id),
        None => false,
    }
}

pub async fn find_ticket_channel(ctx: &Context, guild_id: GuildId, user_id: UserId) -> serenity::Result<Option<GuildChannel>> {
    let channels = guild_id.channels(&ctx.http).await?;

    Ok(channels.into_values().find(|v| channel_owner(v) == Some(user_id)))
}

pub async fn find_support_role(ctx: &Context, guild_id: GuildId, name: &str) -> serenity::Result<Option<RoleId>> {
    let roles = guild_id.roles(&ctx.http).await?;

    Ok(roles.into_iter().find(|(_, role)| role.name == name).map(|(id, _)| id))
}

pub async fn member_may_act(ctx: &Context, guild_id: GuildId, channel_id: ChannelId, member: &Member, support_role_name: &str) -> serenity::Result<bool> {
    let owner = match channel_id.to_channel(ctx).await? {
        Channel::Guild(v) => channel_owner(&v),
        _ => None,
    };

    if owner == Some(member.user.id) {
        return Ok(true);
    }

    let support_role = find_support_role(ctx, guild_id, support_role_name).await?;
    Ok(may_act_on_ticket(owner, member.user.id, &member.roles, support_role))
}

// Closes the window where the same user double-invokes ticket creation while
// the first invocation is still awaiting the channel scan or create call.
pub struct CreationGuard {
    in_flight: DashMap<UserId, ()>,
}

impl CreationGuard {
    pub fn new() -> Self {
        Self { in_flight: DashMap::new() }
    }

    pub fn try_claim(&self, user_id: UserId) -> bool {
        match self.in_flight.entry(user_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(v) => {
                v.insert(());
                true
            }
        }
    }

    pub fn release(&self, user_id: UserId) {
        self.in_flight.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_round_trips() {
        let marker = owner_marker(UserId(111));
        assert_eq!(marker, "TicketOwnerID:111");
        assert_eq!(parse_owner(&marker), Some(UserId(111)));
    }

    #[test]
    fn marker_parses_inside_free_text() {
        assert_eq!(parse_owner("Support ticket | TicketOwnerID:424242 | do not edit"), Some(UserId(424242)));
    }

    #[test]
    fn marker_absent_or_malformed_parses_to_none() {
        assert_eq!(parse_owner(""), None);
        assert_eq!(parse_owner("general chatter"), None);
        assert_eq!(parse_owner("TicketOwnerID:"), None);
        assert_eq!(parse_owner("TicketOwnerID:abc"), None);
        // Larger than u64.
        assert_eq!(parse_owner("TicketOwnerID:99999999999999999999999999"), None);
    }

    #[test]
    fn channel_name_is_prefixed_and_lowercased() {
        assert_eq!(ticket_channel_name("Aria"), "ticket-aria");
        assert_eq!(ticket_channel_name("ALLCAPS"), "ticket-allcaps");
    }

    #[test]
    fn owner_passes_without_any_role() {
        assert!(may_act_on_ticket(Some(UserId(111)), UserId(111), &[], None));
    }

    #[test]
    fn support_role_holder_passes_on_any_ticket() {
        let roles = vec![RoleId(7), RoleId(9)];
        assert!(may_act_on_ticket(Some(UserId(111)), UserId(222), &roles, Some(RoleId(9))));
        assert!(may_act_on_ticket(None, UserId(222), &roles, Some(RoleId(9))));
    }

    #[test]
    fn others_are_denied() {
        let roles = vec![RoleId(7)];
        assert!(!may_act_on_ticket(Some(UserId(111)), UserId(222), &roles, Some(RoleId(9))));
        // No support role configured in the guild never grants access.
        assert!(!may_act_on_ticket(Some(UserId(111)), UserId(222), &roles, None));
        assert!(!may_act_on_ticket(None, UserId(222), &[], None));
    }

    #[test]
    fn guard_rejects_second_claim_until_release() {
        let guard = CreationGuard::new();

        assert!(guard.try_claim(UserId(1)));
        assert!(!guard.try_claim(UserId(1)));

        guard.release(UserId(1));
        assert!(guard.try_claim(UserId(1)));
    }

    #[test]
    fn guard_does_not_contend_across_users() {
        let guard = CreationGuard::new();

        assert!(guard.try_claim(UserId(1)));
        assert!(guard.try_claim(UserId(2)));
    }
}
