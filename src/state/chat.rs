use std::rc::Rc;
use yew::Reducible;

pub const CHAT_ERROR_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// Conversation shown in the chat panel. `busy` doubles as the send guard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
    pub busy: bool,
}

#[derive(Clone, Debug)]
pub enum ChatAction {
    /// User message accepted; opens an empty assistant reply.
    Send(String),
    Append(String),
    Failed,
    Settled,
}

/// Single-request guard held outside the reducer, so a second send is refused
/// before any render observes `busy`.
#[derive(Debug, Default)]
pub struct SendGate {
    in_flight: bool,
}

impl SendGate {
    /// True when the caller may start a request; the gate stays closed until `release`.
    pub fn try_acquire(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn release(&mut self) {
        self.in_flight = false;
    }
}

impl ChatLog {
    fn open_reply(&mut self) -> &mut ChatMessage {
        let needs_new = !matches!(self.messages.last(), Some(m) if m.role == ChatRole::Assistant);
        if needs_new {
            self.messages.push(ChatMessage { role: ChatRole::Assistant, text: String::new() });
        }
        let last = self.messages.len() - 1;
        &mut self.messages[last]
    }
}

impl Reducible for ChatLog {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            ChatAction::Send(text) => {
                if new.busy {
                    return self;
                }
                new.messages.push(ChatMessage { role: ChatRole::User, text });
                new.messages.push(ChatMessage { role: ChatRole::Assistant, text: String::new() });
                new.busy = true;
            }
            ChatAction::Append(chunk) => new.open_reply().text.push_str(&chunk),
            ChatAction::Failed => {
                let reply = new.open_reply();
                if reply.text.is_empty() {
                    reply.text = CHAT_ERROR_MESSAGE.to_string();
                } else {
                    new.messages.push(ChatMessage {
                        role: ChatRole::Assistant,
                        text: CHAT_ERROR_MESSAGE.to_string(),
                    });
                }
            }
            ChatAction::Settled => new.busy = false,
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn msg(role: ChatRole, text: &str) -> ChatMessage {
        ChatMessage { role, text: text.into() }
    }

    #[test]
    fn streamed_text_accumulates_in_one_reply() {
        let log = Rc::new(ChatLog::default())
            .reduce(ChatAction::Send("where is it deep?".into()))
            .reduce(ChatAction::Append("The trench ".into()))
            .reduce(ChatAction::Append("at row 4.".into()));
        assert!(log.busy);
        assert_eq!(log.messages, vec![
            msg(ChatRole::User, "where is it deep?"),
            msg(ChatRole::Assistant, "The trench at row 4."),
        ]);
        let log = log.reduce(ChatAction::Settled);
        assert!(!log.busy);
    }

    #[test]
    fn second_send_while_busy_is_ignored() {
        let log = Rc::new(ChatLog::default())
            .reduce(ChatAction::Send("one".into()))
            .reduce(ChatAction::Send("two".into()));
        assert_eq!(log.messages.len(), 2);
    }

    #[test]
    fn gate_refuses_overlapping_sends() {
        let mut gate = SendGate::default();
        assert!(gate.try_acquire());
        assert!(!gate.try_acquire());
        gate.release();
        assert!(gate.try_acquire());
    }

    #[test]
    fn failure_appends_fixed_message_and_settles() {
        let log = Rc::new(ChatLog::default())
            .reduce(ChatAction::Send("hi".into()))
            .reduce(ChatAction::Failed)
            .reduce(ChatAction::Settled);
        assert_eq!(log.messages[1], msg(ChatRole::Assistant, CHAT_ERROR_MESSAGE));
        assert!(!log.busy);

        let log = Rc::new(ChatLog::default())
            .reduce(ChatAction::Send("hi".into()))
            .reduce(ChatAction::Append("partial".into()))
            .reduce(ChatAction::Failed);
        assert_eq!(log.messages.len(), 3);
        assert_eq!(log.messages[2], msg(ChatRole::Assistant, CHAT_ERROR_MESSAGE));
    }
}
