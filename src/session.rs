//! Request-scoped conversation state and the cache-first answer policy.
//!
//! A [`ConversationContext`] is owned by whoever serves one user session and
//! is passed into [`respond`] on every turn. Only the first question of a
//! conversation is looked up in, and saved to, the cache; follow-up turns
//! depend on history and always go to the pipeline.

use serde::Serialize;

use crate::cache::SemanticCache;
use crate::embedding::Embedder;
use crate::errors::Error;

/// Greeting placed at the start of every conversation.
pub const DEFAULT_WELCOME: &str = "Welcome to customer support. How can I help you?";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single conversation message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Conversation history for one session.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    welcome: String,
    messages: Vec<Message>,
}

impl ConversationContext {
    /// Start a conversation with the given welcome message.
    pub fn new(welcome: &str) -> Self {
        ConversationContext {
            welcome: welcome.to_string(),
            messages: vec![Message {
                role: Role::Assistant,
                content: welcome.to_string(),
            }],
        }
    }

    /// True while nothing but the welcome message has been exchanged.
    pub fn is_first_question(&self) -> bool {
        self.messages.len() == 1
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Drop the history and start over from the welcome message.
    pub fn clear(&mut self) {
        *self = Self::new(&self.welcome);
    }

    /// Content of the most recent assistant message.
    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    fn record_turn(&mut self, query: &str, answer: &str) {
        self.messages.push(Message {
            role: Role::User,
            content: query.to_string(),
        });
        self.messages.push(Message {
            role: Role::Assistant,
            content: answer.to_string(),
        });
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new(DEFAULT_WELCOME)
    }
}

/// Produces a fresh answer when the cache cannot.
///
/// Stands in for the LLM and tool-calling pipeline; `history` holds the
/// conversation up to and including the current user message.
pub trait AnswerPipeline {
    fn answer(&mut self, query: &str, history: &[Message]) -> Result<String, Error>;
}

impl<F> AnswerPipeline for F
where
    F: FnMut(&str, &[Message]) -> Result<String, Error>,
{
    fn answer(&mut self, query: &str, history: &[Message]) -> Result<String, Error> {
        self(query, history)
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Cache,
    Pipeline,
}

/// The assistant's reply to one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

/// Answer one user turn, consulting the cache on the first question.
///
/// Cache errors are returned, not treated as misses. The user message and
/// the reply are recorded together once an answer exists, so a failed
/// lookup or pipeline call leaves `ctx` unchanged and the same query can be
/// retried. If only the final cache save fails, the pipeline answer is
/// already recorded and can be read back with
/// [`ConversationContext::last_reply`].
pub fn respond<E, P>(
    ctx: &mut ConversationContext,
    cache: &mut SemanticCache<E>,
    query: &str,
    pipeline: &mut P,
) -> Result<Reply, Error>
where
    E: Embedder,
    P: AnswerPipeline + ?Sized,
{
    let first_question = ctx.is_first_question();

    if first_question {
        if let Some(answer) = cache.search(query)? {
            tracing::debug!("answered from cache");
            ctx.record_turn(query, &answer);
            return Ok(Reply {
                text: answer,
                source: ReplySource::Cache,
            });
        }
    }

    let mut history = ctx.messages.clone();
    history.push(Message {
        role: Role::User,
        content: query.to_string(),
    });
    let answer = pipeline.answer(query, &history)?;
    ctx.record_turn(query, &answer);

    if first_question {
        cache.save(query, &answer)?;
    }

    Ok(Reply {
        text: answer,
        source: ReplySource::Pipeline,
    })
}
