//! Agent runtime - the think/act/observe loop over the inventory store.
//!
//! This crate implements the reasoning loop directly rather than delegating
//! to an agent framework:
//!
//! 1. **Prompt assembly** (`prompt`) - tool catalogue + format grammar +
//!    question + transcript scratchpad
//! 2. **Completion** (`llm`) - opaque text-completion boundary with one
//!    OpenAI-compatible HTTP client behind it
//! 3. **Parsing** (`parser`) - tolerant grammar parser producing
//!    `FinalAnswer | Action | Malformed`; it never fails
//! 4. **Dispatch** (`tools`) - uniform name-based tool registry built once
//!    at startup
//! 5. **Loop** (`runtime`) - iterate until a final answer or the iteration
//!    budget runs out
//!
//! # Key Types
//!
//! - `AgentRuntime` - the loop controller (see `runtime`)
//! - `LlmClient` - pluggable completion boundary
//! - `ToolRegistry` - immutable name -> tool dispatch table
//!
//! # Failure Model
//!
//! Malformed completions and tool errors are recovered inside the loop by
//! feeding a corrective observation back to the model. Only completion
//! transport/API failures terminate a question early.

pub mod llm;
pub mod parser;
pub mod prompt;
pub mod runtime;
pub mod tools;
pub mod transcript;

pub use llm::{CompletionError, LlmClient, OpenAiCompatClient};
pub use runtime::{AgentError, AgentRuntime, ITERATION_LIMIT_ANSWER, MALFORMED_OBSERVATION};
pub use tools::{Tool, ToolRegistry};
