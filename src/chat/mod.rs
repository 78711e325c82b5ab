pub mod irc;
pub mod twitch;

use crate::events::ChatEvent;
use irc::IrcMessage;

pub use twitch::TwitchChat;

impl ChatEvent {
    /// Builds an event from a `PRIVMSG` line. Other commands yield `None`.
    pub fn from_privmsg(msg: &IrcMessage) -> Option<Self> {
        if msg.command != "PRIVMSG" {
            return None;
        }
        let channel = msg.param(0)?.trim_start_matches('#');
        let text = msg.param(1).unwrap_or("");
        let user = msg
            .tag("display-name")
            .or_else(|| msg.nick())
            .unwrap_or("");

        let mut event = ChatEvent::new(channel, user, text);
        if let Some(reward_id) = msg.tag("custom-reward-id") {
            event = event.with_reward_id(reward_id);
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::irc::parse_line;
    use crate::events::ChatEvent;

    #[test]
    fn privmsg_becomes_chat_event() {
        let msg = parse_line(
            "@custom-reward-id=abc;display-name=Viewer :viewer!viewer@viewer.tmi.twitch.tv PRIVMSG #squishydough :gimme",
        )
        .unwrap();
        let event = ChatEvent::from_privmsg(&msg).unwrap();
        assert_eq!(event.channel, "squishydough");
        assert_eq!(event.user, "Viewer");
        assert_eq!(event.message, "gimme");
        assert_eq!(event.reward_id.as_deref(), Some("abc"));
    }

    #[test]
    fn missing_display_name_falls_back_to_nick() {
        let msg = parse_line(":viewer!viewer@host PRIVMSG #c :!angel").unwrap();
        let event = ChatEvent::from_privmsg(&msg).unwrap();
        assert_eq!(event.user, "viewer");
        assert_eq!(event.reward_id, None);
    }

    #[test]
    fn other_commands_are_ignored() {
        let msg = parse_line(":tmi.twitch.tv NOTICE * :Login unsuccessful").unwrap();
        assert!(ChatEvent::from_privmsg(&msg).is_none());
    }
}
