//! Client-side chat log.

use kairo_shared::Message;

/// Append-only, ordered record of the messages seen or sent in a session.
///
/// Insertion order is display order: the head is the oldest message and the
/// tail the newest.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChatLog {
    messages: Vec<Message>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the tail
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Oldest message
    pub fn head(&self) -> Option<&Message> {
        self.messages.first()
    }

    /// Newest message
    pub fn tail(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChatLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
