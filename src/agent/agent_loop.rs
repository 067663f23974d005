//! The Agent Loop
//!
//! The core ReAct loop: think, optionally act, observe, repeat, until the
//! model emits an `Answer:` marker or the iteration cap runs out. The
//! transcript lives for one query and is returned whole at termination.

use std::sync::Arc;

use tracing::{info, warn};

use crate::types::{ChatMessage, CompletionClient, SearchClient};

use super::dispatch::parse_action;

/// Reply substituted when the completion service faults. Appended to the
/// transcript like any other assistant message; never re-raised.
pub const COMPLETION_FAILURE_SENTINEL: &str = "Error: Failed to get response from the model.";

/// Observation substituted when the search service faults.
pub const SEARCH_FAILURE_SENTINEL: &str = "Error: Failed to perform internet search.";

/// Substring whose presence in a reply terminates the loop.
pub const ANSWER_MARKER: &str = "Answer:";

/// Returned by [`extract_answer`] for an empty transcript.
pub const NO_MESSAGES: &str = "No messages found.";

/// Returned by [`extract_answer`] when the last message has no marker.
pub const NO_ANSWER: &str = "No answer found in the output.";

/// A conversation with the completion service. Owns the transcript;
/// mutated only by appending.
pub struct Agent {
    completion: Arc<dyn CompletionClient>,
    messages: Vec<ChatMessage>,
}

impl Agent {
    /// Create an agent. If `system_prompt` is given it becomes the sole
    /// system message at position 0.
    pub fn new(completion: Arc<dyn CompletionClient>, system_prompt: Option<&str>) -> Self {
        let mut messages = Vec::new();
        if let Some(prompt) = system_prompt {
            messages.push(ChatMessage::system(prompt));
        }
        Self { completion, messages }
    }

    /// Send a message and return the model's reply.
    ///
    /// A non-empty `message` is appended as a user message first. The whole
    /// transcript is then sent to the completion service. Faults are not
    /// propagated: the sentinel reply takes the place of a real one and is
    /// appended like any other assistant message.
    pub async fn send(&mut self, message: &str) -> String {
        if !message.is_empty() {
            self.messages.push(ChatMessage::user(message));
        }

        let reply = match self.completion.complete(&self.messages).await {
            Ok(response) => response.content,
            Err(err) => {
                warn!("Completion call failed: {err:#}");
                eprintln!("Error during API call: {err}");
                COMPLETION_FAILURE_SENTINEL.to_string()
            }
        };

        self.messages.push(ChatMessage::assistant(&reply));
        reply
    }

    /// The transcript so far.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Consume the agent, yielding the transcript.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }
}

/// Options for running the agent loop.
pub struct AgentLoopOptions {
    pub completion: Arc<dyn CompletionClient>,
    pub search: Option<Arc<dyn SearchClient>>,
    pub system_prompt: Option<String>,
    pub max_iterations: u32,
    /// When true, parse `Action: internet_search:` directives out of each
    /// reply, run the real search, and feed the result back as an
    /// `Observation:` message. When false, reproduce the literal loop:
    /// the original query is resubmitted unchanged every iteration and
    /// the search client is never called.
    pub dispatch_actions: bool,
}

/// Drive at most `max_iterations` completion calls for one query.
///
/// Stops on the first reply containing [`ANSWER_MARKER`]; reaching the cap
/// without a match is a normal termination. Returns the full transcript
/// either way.
pub async fn run_agent_loop(query: &str, options: AgentLoopOptions) -> Vec<ChatMessage> {
    let AgentLoopOptions {
        completion,
        search,
        system_prompt,
        max_iterations,
        dispatch_actions,
    } = options;

    info!(model = %completion.model(), max_iterations, dispatch_actions, "starting agent loop");

    let mut agent = Agent::new(completion, system_prompt.as_deref());
    let mut next_message = query.to_string();

    for iteration in 1..=max_iterations {
        let reply = agent.send(&next_message).await;
        println!("{reply}");

        if reply.contains(ANSWER_MARKER) {
            info!(iteration, "answer marker found");
            break;
        }

        if dispatch_actions {
            match parse_action(&reply) {
                Some(search_query) => {
                    let observation = match &search {
                        Some(client) => match client.search(&search_query).await {
                            Ok(result) => result,
                            Err(err) => {
                                warn!("Search call failed: {err:#}");
                                eprintln!("Error during internet search: {err}");
                                SEARCH_FAILURE_SENTINEL.to_string()
                            }
                        },
                        None => SEARCH_FAILURE_SENTINEL.to_string(),
                    };
                    next_message = format!("Observation: {observation}");
                }
                None => {
                    // Neither an answer nor an action: the model has
                    // stalled, so stop rather than loop on nothing.
                    info!(iteration, "no action directive in reply; stopping");
                    break;
                }
            }
        } else {
            // Literal behavior: the initiating query goes back in as a
            // fresh user message on every iteration.
            next_message = query.to_string();
        }
    }

    agent.into_messages()
}

/// Extract the final answer from a finished transcript.
///
/// Only the last message is examined: everything after the first
/// [`ANSWER_MARKER`] occurrence, trimmed. Lossy on purpose; an answer
/// produced earlier but not repeated at the end is not recovered.
pub fn extract_answer(messages: &[ChatMessage]) -> String {
    let Some(last) = messages.last() else {
        return NO_MESSAGES.to_string();
    };

    match last.content.find(ANSWER_MARKER) {
        Some(pos) => last.content[pos + ANSWER_MARKER.len()..].trim().to_string(),
        None => NO_ANSWER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::types::{CompletionResponse, TokenUsage};

    /// Completion client that plays back scripted replies in order.
    struct ScriptedCompletion {
        replies: Mutex<Vec<Result<String, String>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedCompletion {
        fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedCompletion {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
        ) -> anyhow::Result<CompletionResponse> {
            *self.calls.lock().unwrap() += 1;
            let mut replies = self.replies.lock().unwrap();
            assert!(!replies.is_empty(), "more completion calls than scripted");
            match replies.remove(0) {
                Ok(content) => Ok(CompletionResponse {
                    content,
                    model: "scripted".to_string(),
                    usage: TokenUsage::default(),
                }),
                Err(msg) => Err(anyhow::anyhow!(msg)),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Search client that records queries and returns a fixed result.
    struct ScriptedSearch {
        queries: Mutex<Vec<String>>,
        result: Result<String, String>,
    }

    #[async_trait]
    impl SearchClient for ScriptedSearch {
        async fn search(&self, query: &str) -> anyhow::Result<String> {
            self.queries.lock().unwrap().push(query.to_string());
            match &self.result {
                Ok(s) => Ok(s.clone()),
                Err(msg) => Err(anyhow::anyhow!(msg.clone())),
            }
        }
    }

    fn literal_options(
        completion: Arc<dyn CompletionClient>,
        max_iterations: u32,
    ) -> AgentLoopOptions {
        AgentLoopOptions {
            completion,
            search: None,
            system_prompt: Some("You are a test agent.".to_string()),
            max_iterations,
            dispatch_actions: false,
        }
    }

    #[tokio::test]
    async fn test_answer_on_first_call() {
        let client = ScriptedCompletion::new(vec![Ok("Thought: ...\nAnswer: 42".to_string())]);
        let options = AgentLoopOptions {
            system_prompt: None,
            ..literal_options(client.clone(), 1)
        };

        let transcript = run_agent_loop("X", options).await;

        assert_eq!(client.calls(), 1);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].content, "X");
        assert!(transcript[1].content.contains("Answer: 42"));
        assert_eq!(extract_answer(&transcript), "42");
    }

    #[tokio::test]
    async fn test_stops_on_first_matching_reply() {
        let client = ScriptedCompletion::new(vec![
            Ok("Thought: still looking".to_string()),
            Ok("Thought: almost there".to_string()),
            Ok("Answer: done".to_string()),
        ]);

        let transcript = run_agent_loop("q", literal_options(client.clone(), 3)).await;

        assert_eq!(client.calls(), 3);
        assert_eq!(extract_answer(&transcript), "done");
    }

    #[tokio::test]
    async fn test_cap_exhaustion_is_normal_termination() {
        let client = ScriptedCompletion::new(vec![
            Ok("Thought: hmm".to_string()),
            Ok("Thought: hmm again".to_string()),
        ]);

        let transcript = run_agent_loop("q", literal_options(client.clone(), 2)).await;

        assert_eq!(client.calls(), 2);
        // system + 2x (user, assistant)
        assert_eq!(transcript.len(), 5);
        assert_eq!(extract_answer(&transcript), NO_ANSWER);
    }

    #[tokio::test]
    async fn test_literal_mode_resubmits_query_every_iteration() {
        let client = ScriptedCompletion::new(vec![
            Ok("Thought: first pass".to_string()),
            Ok("Answer: ok".to_string()),
        ]);

        let transcript = run_agent_loop("same question", literal_options(client, 2)).await;

        let user_messages: Vec<_> = transcript
            .iter()
            .filter(|m| m.role == crate::types::ChatRole::User)
            .collect();
        assert_eq!(user_messages.len(), 2);
        assert!(user_messages.iter().all(|m| m.content == "same question"));
    }

    #[tokio::test]
    async fn test_completion_fault_becomes_sentinel_and_loop_continues() {
        let client = ScriptedCompletion::new(vec![
            Err("connection refused".to_string()),
            Ok("Answer: recovered".to_string()),
        ]);

        let transcript = run_agent_loop("q", literal_options(client.clone(), 3)).await;

        assert_eq!(client.calls(), 2);
        let sentinel = transcript
            .iter()
            .find(|m| m.content == COMPLETION_FAILURE_SENTINEL);
        assert!(sentinel.is_some());
        assert_eq!(extract_answer(&transcript), "recovered");
    }

    #[tokio::test]
    async fn test_fault_on_every_call_runs_to_cap() {
        let client = ScriptedCompletion::new(vec![
            Err("down".to_string()),
            Err("down".to_string()),
            Err("down".to_string()),
        ]);

        let transcript = run_agent_loop("q", literal_options(client.clone(), 3)).await;

        assert_eq!(client.calls(), 3);
        assert_eq!(extract_answer(&transcript), NO_ANSWER);
        assert!(transcript.last().unwrap().content == COMPLETION_FAILURE_SENTINEL);
    }

    #[tokio::test]
    async fn test_dispatch_mode_runs_search_and_injects_observation() {
        let client = ScriptedCompletion::new(vec![
            Ok("Thought: need facts.\nAction: internet_search: population of France\nPAUSE"
                .to_string()),
            Ok("Answer: about 68 million".to_string()),
        ]);
        let search = Arc::new(ScriptedSearch {
            queries: Mutex::new(Vec::new()),
            result: Ok("France has about 68 million people.".to_string()),
        });

        let options = AgentLoopOptions {
            completion: client.clone(),
            search: Some(search.clone()),
            system_prompt: None,
            max_iterations: 5,
            dispatch_actions: true,
        };

        let transcript = run_agent_loop("How many people live in France?", options).await;

        assert_eq!(client.calls(), 2);
        assert_eq!(
            search.queries.lock().unwrap().as_slice(),
            ["population of France"]
        );
        let observation = transcript
            .iter()
            .find(|m| m.content.starts_with("Observation: "))
            .expect("observation message injected");
        assert!(observation.content.contains("68 million"));
        assert_eq!(extract_answer(&transcript), "about 68 million");
    }

    #[tokio::test]
    async fn test_dispatch_mode_search_fault_injects_sentinel() {
        let client = ScriptedCompletion::new(vec![
            Ok("Action: internet_search: anything\nPAUSE".to_string()),
            Ok("Answer: gave up".to_string()),
        ]);
        let search = Arc::new(ScriptedSearch {
            queries: Mutex::new(Vec::new()),
            result: Err("timeout".to_string()),
        });

        let options = AgentLoopOptions {
            completion: client,
            search: Some(search),
            system_prompt: None,
            max_iterations: 5,
            dispatch_actions: true,
        };

        let transcript = run_agent_loop("q", options).await;

        let observation = transcript
            .iter()
            .find(|m| m.content.starts_with("Observation: "))
            .unwrap();
        assert_eq!(
            observation.content,
            format!("Observation: {SEARCH_FAILURE_SENTINEL}")
        );
    }

    #[tokio::test]
    async fn test_dispatch_mode_stops_when_model_stalls() {
        let client = ScriptedCompletion::new(vec![Ok(
            "Thought: nothing actionable here.".to_string()
        )]);

        let options = AgentLoopOptions {
            completion: client.clone(),
            search: None,
            system_prompt: None,
            max_iterations: 5,
            dispatch_actions: true,
        };

        run_agent_loop("q", options).await;
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_send_with_empty_message_appends_no_user_turn() {
        let client = ScriptedCompletion::new(vec![Ok("ok".to_string())]);
        let mut agent = Agent::new(client, Some("sys"));

        agent.send("").await;

        assert_eq!(agent.messages().len(), 2);
        assert_eq!(agent.messages()[0].role, crate::types::ChatRole::System);
        assert_eq!(agent.messages()[1].role, crate::types::ChatRole::Assistant);
    }

    #[test]
    fn test_extract_answer_empty_transcript() {
        assert_eq!(extract_answer(&[]), NO_MESSAGES);
    }

    #[test]
    fn test_extract_answer_trims_whitespace() {
        let transcript = vec![ChatMessage::assistant("Answer:   spaced out  \n")];
        assert_eq!(extract_answer(&transcript), "spaced out");
    }

    #[test]
    fn test_extract_answer_multiline() {
        let transcript = vec![ChatMessage::assistant(
            "Thought: done.\nAnswer: line one\nline two",
        )];
        assert_eq!(extract_answer(&transcript), "line one\nline two");
    }

    #[test]
    fn test_extract_answer_empty_answer() {
        let transcript = vec![ChatMessage::assistant("Answer:")];
        assert_eq!(extract_answer(&transcript), "");
    }

    #[test]
    fn test_extract_answer_only_checks_last_message() {
        let transcript = vec![
            ChatMessage::assistant("Answer: early answer"),
            ChatMessage::assistant("Thought: moved on."),
        ];
        assert_eq!(extract_answer(&transcript), NO_ANSWER);
    }
}
