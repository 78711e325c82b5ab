use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use anyhow::Context;
use rand::Rng;

use super::irc::{parse_line, IrcMessage};
use crate::events::ChatEvent;

/// Read-only Twitch chat connection. Connects anonymously and never reconnects.
pub struct TwitchChat<R, W> {
    reader: R,
    writer: W,
    channel: String,
}

impl TwitchChat<BufReader<TcpStream>, TcpStream> {
    pub fn connect(server: &str, channel: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(server)
            .with_context(|| format!("connect to twitch chat at {server}"))?;
        let reader = BufReader::new(stream.try_clone().context("clone chat socket")?);
        let mut chat = Self::new(reader, stream, channel);
        chat.join()?;
        tracing::info!(channel = %chat.channel, server, "listening to twitch chat");
        Ok(chat)
    }
}

impl<R: BufRead, W: Write> TwitchChat<R, W> {
    pub fn new(reader: R, writer: W, channel: &str) -> Self {
        Self {
            reader,
            writer,
            channel: channel.trim_start_matches('#').to_lowercase(),
        }
    }

    /// Requests message tags, logs in as an anonymous `justinfan` user and joins the channel.
    pub fn join(&mut self) -> anyhow::Result<()> {
        let nick = format!("justinfan{}", rand::thread_rng().gen_range(10_000..100_000));
        self.send("CAP REQ :twitch.tv/tags")?;
        self.send(&format!("NICK {nick}"))?;
        self.send(&format!("JOIN #{}", self.channel))?;
        Ok(())
    }

    /// Blocks until the next chat message. `Ok(None)` once the server closes the connection.
    pub fn next_event(&mut self) -> anyhow::Result<Option<ChatEvent>> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut buf)
                .context("read from twitch chat")?;
            if read == 0 {
                return Ok(None);
            }

            let line = String::from_utf8_lossy(&buf);
            let msg = match parse_line(&line) {
                Ok(msg) => msg,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping chat line");
                    continue;
                }
            };

            if let Some(event) = self.handle(&msg)? {
                return Ok(Some(event));
            }
            if msg.command == "RECONNECT" {
                tracing::warn!("twitch asked us to reconnect; closing chat");
                return Ok(None);
            }
        }
    }

    fn handle(&mut self, msg: &IrcMessage) -> anyhow::Result<Option<ChatEvent>> {
        match msg.command.as_str() {
            "PING" => {
                let token = msg.param(0).unwrap_or("tmi.twitch.tv").to_string();
                self.send(&format!("PONG :{token}"))?;
                Ok(None)
            }
            "PRIVMSG" => Ok(ChatEvent::from_privmsg(msg)),
            "NOTICE" => {
                tracing::warn!(notice = msg.param(1).unwrap_or(""), "twitch notice");
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn send(&mut self, line: &str) -> anyhow::Result<()> {
        tracing::debug!(line, "chat >");
        self.writer
            .write_all(format!("{line}\r\n").as_bytes())
            .context("write to twitch chat")?;
        self.writer.flush().context("flush twitch chat")?;
        Ok(())
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn transcript(lines: &[&str]) -> Cursor<Vec<u8>> {
        let mut raw = String::new();
        for line in lines {
            raw.push_str(line);
            raw.push_str("\r\n");
        }
        Cursor::new(raw.into_bytes())
    }

    #[test]
    fn join_sends_handshake() {
        let mut out = Vec::new();
        let mut chat = TwitchChat::new(transcript(&[]), &mut out, "#SquishyDough");
        chat.join().unwrap();
        drop(chat);

        let sent = String::from_utf8(out).unwrap();
        let lines: Vec<_> = sent.lines().collect();
        assert_eq!(lines[0], "CAP REQ :twitch.tv/tags");
        assert!(lines[1].starts_with("NICK justinfan"));
        assert_eq!(lines[2], "JOIN #squishydough");
    }

    #[test]
    fn yields_privmsgs_and_answers_pings() {
        let input = transcript(&[
            ":tmi.twitch.tv 001 justinfan1 :Welcome, GLHF!",
            "PING :tmi.twitch.tv",
            "garbage-without-anything-else",
            "@custom-reward-id=r1;display-name=A :a!a@a PRIVMSG #c :hi",
            ":b!b@b PRIVMSG #c :!angel",
        ]);
        let mut out = Vec::new();
        let mut chat = TwitchChat::new(input, &mut out, "c");

        let first = chat.next_event().unwrap().unwrap();
        assert_eq!(first.reward_id.as_deref(), Some("r1"));
        let second = chat.next_event().unwrap().unwrap();
        assert_eq!(second.message, "!angel");
        assert!(chat.next_event().unwrap().is_none());
        drop(chat);

        assert_eq!(String::from_utf8(out).unwrap(), "PONG :tmi.twitch.tv\r\n");
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_stream() {
        let mut raw = b":x!x@x PRIVMSG #c :bad \xff\xfe\r\n".to_vec();
        raw.extend_from_slice(b":b!b@b PRIVMSG #c :!angel\r\n");
        let mut chat = TwitchChat::new(Cursor::new(raw), Vec::new(), "c");

        let first = chat.next_event().unwrap().unwrap();
        assert!(first.message.starts_with("bad "));
        let second = chat.next_event().unwrap().unwrap();
        assert_eq!(second.message, "!angel");
        assert!(chat.next_event().unwrap().is_none());
    }

    #[test]
    fn reconnect_ends_the_stream() {
        let input = transcript(&[":tmi.twitch.tv RECONNECT", ":b!b@b PRIVMSG #c :late"]);
        let mut chat = TwitchChat::new(input, Vec::new(), "c");
        assert!(chat.next_event().unwrap().is_none());
    }
}
