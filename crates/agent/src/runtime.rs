use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm::{CompletionError, LlmClient};
use crate::parser::{parse_completion, ParsedCompletion};
use crate::prompt::build_prompt;
use crate::tools::ToolRegistry;
use crate::transcript::{Step, Transcript};

/// Answer returned when the iteration budget runs out. A defined outcome,
/// not an error.
pub const ITERATION_LIMIT_ANSWER: &str = "Agent stopped due to iteration limit or time limit.";

/// Observation injected when a completion matches neither grammar branch.
pub const MALFORMED_OBSERVATION: &str = "Could not parse the reply. Use the required format: \
     either an 'Action:' line followed by 'Action Input:', or 'Final Answer:'.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("completion service failure: {0}")]
    Completion(#[from] CompletionError),
}

/// The loop controller. Constructed once at process start and handed to the
/// hosting surface by reference; concurrent questions share nothing mutable
/// through it.
pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    max_iterations: u32,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry, max_iterations: u32) -> Self {
        Self { llm, tools, max_iterations }
    }

    /// Drive one question through the think/act/observe loop.
    ///
    /// Each pass makes exactly one completion call, so at most
    /// `max_iterations` calls happen per question. Malformed completions and
    /// tool errors are folded back into the transcript as observations;
    /// only completion-service failures abort the question.
    pub async fn answer(&self, question: &str) -> Result<String, AgentError> {
        let correlation_id = Uuid::new_v4();
        info!(
            event_name = "agent.question.start",
            correlation_id = %correlation_id,
            "processing question"
        );

        let mut transcript = Transcript::new();

        for iteration in 0..self.max_iterations {
            let prompt = build_prompt(question, &self.tools, &transcript);
            let completion = self.llm.complete(&prompt).await?;
            debug!(
                event_name = "agent.iteration.completion_received",
                correlation_id = %correlation_id,
                iteration,
                length = completion.len(),
                "received completion"
            );

            match parse_completion(&completion) {
                ParsedCompletion::FinalAnswer(answer) => {
                    info!(
                        event_name = "agent.question.answered",
                        correlation_id = %correlation_id,
                        iterations = iteration + 1,
                        "final answer produced"
                    );
                    return Ok(answer);
                }
                ParsedCompletion::Action { thought, tool, input } => {
                    let observation = self.dispatch(&correlation_id, &tool, &input).await;
                    transcript.push(Step {
                        thought,
                        action: Some(tool),
                        action_input: Some(input),
                        observation: Some(observation),
                    });
                }
                ParsedCompletion::Malformed(raw) => {
                    warn!(
                        event_name = "agent.completion.malformed",
                        correlation_id = %correlation_id,
                        iteration,
                        "completion did not match the expected format"
                    );
                    transcript.push(Step {
                        thought: raw,
                        action: None,
                        action_input: None,
                        observation: Some(MALFORMED_OBSERVATION.to_string()),
                    });
                }
            }
        }

        info!(
            event_name = "agent.question.budget_exhausted",
            correlation_id = %correlation_id,
            max_iterations = self.max_iterations,
            "iteration budget exhausted without a final answer"
        );
        Ok(ITERATION_LIMIT_ANSWER.to_string())
    }

    /// Tool dispatch boundary: every failure becomes observation text so the
    /// model can recover on the next pass.
    async fn dispatch(&self, correlation_id: &Uuid, tool: &str, input: &str) -> String {
        let Some(tool_impl) = self.tools.get(tool) else {
            warn!(
                event_name = "agent.tool.unknown",
                correlation_id = %correlation_id,
                tool,
                "model requested an unregistered tool"
            );
            return format!("Unknown tool '{tool}'. Valid tools: [{}].", self.tools.names().join(", "));
        };

        debug!(
            event_name = "agent.tool.invoke",
            correlation_id = %correlation_id,
            tool,
            "invoking tool"
        );
        match tool_impl.invoke(input).await {
            Ok(output) => output,
            Err(err) => {
                warn!(
                    event_name = "agent.tool.failed",
                    correlation_id = %correlation_id,
                    tool,
                    error = %err,
                    "tool invocation failed"
                );
                format!("Error: {err}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use super::{AgentError, AgentRuntime, ITERATION_LIMIT_ANSWER, MALFORMED_OBSERVATION};
    use crate::llm::{CompletionError, LlmClient};
    use crate::tools::{Tool, ToolRegistry};

    enum Scripted {
        Reply(&'static str),
        Failure,
    }

    struct ScriptedClient {
        replies: Mutex<VecDeque<Scripted>>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn prompt(&self, index: usize) -> String {
            self.prompts.lock().expect("prompt log")[index].clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().expect("prompt log").push(prompt.to_string());

            match self.replies.lock().expect("script").pop_front() {
                Some(Scripted::Reply(text)) => Ok(text.to_string()),
                Some(Scripted::Failure) => Err(CompletionError::Api {
                    status: 503,
                    body: "scripted outage".to_string(),
                }),
                None => Err(CompletionError::EmptyResponse),
            }
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the input back."
        }

        async fn invoke(&self, input: &str) -> Result<String> {
            Ok(format!("echo:{input}"))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl Tool for FailingTool {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn description(&self) -> &'static str {
            "Always fails."
        }

        async fn invoke(&self, _input: &str) -> Result<String> {
            Err(anyhow!("boom"))
        }
    }

    fn runtime(client: Arc<ScriptedClient>, max_iterations: u32) -> AgentRuntime {
        let mut tools = ToolRegistry::default();
        tools.register(EchoTool);
        tools.register(FailingTool);
        AgentRuntime::new(client, tools, max_iterations)
    }

    #[tokio::test]
    async fn final_answer_on_first_pass_makes_one_call() {
        let client = ScriptedClient::new(vec![Scripted::Reply(
            "Thought: I know this already.\nFinal Answer: ten products",
        )]);
        let agent = runtime(client.clone(), 10);

        let answer = agent.answer("How many products are there?").await.expect("answer");

        assert_eq!(answer, "ten products");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn action_then_final_answer_makes_two_calls() {
        let client = ScriptedClient::new(vec![
            Scripted::Reply("Thought: echo it\nAction: echo\nAction Input: hello"),
            Scripted::Reply("Thought: done\nFinal Answer: it said hello"),
        ]);
        let agent = runtime(client.clone(), 10);

        let answer = agent.answer("Say hello").await.expect("answer");

        assert_eq!(answer, "it said hello");
        assert_eq!(client.calls(), 2);
        assert!(
            client.prompt(1).contains("Observation: echo:hello"),
            "second prompt should carry the observation"
        );
    }

    #[tokio::test]
    async fn malformed_reply_is_corrected_and_the_loop_continues() {
        let client = ScriptedClient::new(vec![
            Scripted::Reply("total gibberish with no markers"),
            Scripted::Reply("Final Answer: recovered"),
        ]);
        let agent = runtime(client.clone(), 10);

        let answer = agent.answer("Anything").await.expect("answer");

        assert_eq!(answer, "recovered");
        assert_eq!(client.calls(), 2, "the parse failure consumes exactly one iteration");
        assert!(
            client.prompt(1).contains(MALFORMED_OBSERVATION),
            "corrective observation should appear in the next prompt"
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_treated_as_a_parse_failure() {
        let client = ScriptedClient::new(vec![
            Scripted::Reply("Thought: guess\nAction: teleport\nAction Input: somewhere"),
            Scripted::Reply("Final Answer: back on track"),
        ]);
        let agent = runtime(client.clone(), 10);

        let answer = agent.answer("Anything").await.expect("answer");

        assert_eq!(answer, "back on track");
        let second_prompt = client.prompt(1);
        assert!(second_prompt.contains("Unknown tool 'teleport'"));
        assert!(second_prompt.contains("echo"), "valid tool names should be listed");
    }

    #[tokio::test]
    async fn tool_failure_becomes_an_error_observation() {
        let client = ScriptedClient::new(vec![
            Scripted::Reply("Thought: try it\nAction: flaky\nAction Input: whatever"),
            Scripted::Reply("Final Answer: gave up on the tool"),
        ]);
        let agent = runtime(client.clone(), 10);

        let answer = agent.answer("Anything").await.expect("answer");

        assert_eq!(answer, "gave up on the tool");
        assert!(
            client.prompt(1).contains("Observation: Error: boom"),
            "tool failure should be fed back as an observation"
        );
    }

    #[tokio::test]
    async fn exhausted_budget_returns_the_fixed_message() {
        let client = ScriptedClient::new(vec![
            Scripted::Reply("nonsense"),
            Scripted::Reply("more nonsense"),
            Scripted::Reply("still nonsense"),
        ]);
        let agent = runtime(client.clone(), 3);

        let answer = agent.answer("Anything").await.expect("answer");

        assert_eq!(answer, ITERATION_LIMIT_ANSWER);
        assert_eq!(client.calls(), 3, "never more completion calls than the budget");
    }

    #[tokio::test]
    async fn completion_failure_is_terminal() {
        let client = ScriptedClient::new(vec![Scripted::Failure]);
        let agent = runtime(client.clone(), 10);

        let result = agent.answer("Anything").await;

        assert!(matches!(result, Err(AgentError::Completion(_))));
        assert_eq!(client.calls(), 1, "service failures are not retried");
    }
}
