use crate::models::Message;
use std::collections::HashMap;

/// Reduce a user's messages to the latest one of each conversation
///
/// A conversation is the unordered pair of participants, so a reply and the
/// message it answers belong to the same conversation. "Latest" is the
/// highest message id. Conversations come back most recent first.
pub fn latest_per_conversation(messages: Vec<Message>) -> Vec<Message> {
    let mut latest: HashMap<(i64, i64), Message> = HashMap::new();

    for message in messages {
        match latest.get(&message.conversation_key()) {
            Some(current) if current.id >= message.id => {}
            _ => {
                latest.insert(message.conversation_key(), message);
            }
        }
    }

    let mut conversations: Vec<Message> = latest.into_values().collect();
    conversations.sort_by(|a, b| b.id.cmp(&a.id));
    conversations
}
