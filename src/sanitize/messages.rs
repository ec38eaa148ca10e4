use rand::{rngs::StdRng, seq::SliceRandom};

use super::names::NameMap;
use super::pools::{GENUINE_MESSAGES, NOISE_MESSAGES, SANITIZED_SUBJECT};
use crate::classify::Keywords;
use crate::export::Message;

/// A template drawn from the noise pool for spam and the genuine pool otherwise.
pub fn replacement_text(text: &str, keywords: &Keywords, rng: &mut StdRng) -> String {
    let pool = if keywords.is_spam(text) {
        NOISE_MESSAGES
    } else {
        GENUINE_MESSAGES
    };
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

/// Replace senders, content and subjects. Senders go through the shared name
/// map, so a sender who is a connection keeps matching that connection. Dates
/// and conversation ids are kept.
pub fn sanitize_messages(
    messages: &[Message],
    names: &mut NameMap,
    keywords: &Keywords,
    rng: &mut StdRng,
) -> Vec<Message> {
    messages
        .iter()
        .map(|msg| {
            let mut out = msg.clone();
            if !out.sender.trim().is_empty() {
                out.sender = names.resolve(&out.sender);
            }
            out.content = replacement_text(&msg.content, keywords, rng);
            if !out.subject.is_empty() {
                out.subject = SANITIZED_SUBJECT.to_string();
            }
            out
        })
        .collect()
}
