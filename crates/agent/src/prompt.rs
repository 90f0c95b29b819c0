use crate::tools::ToolRegistry;
use crate::transcript::Transcript;

/// Assemble the full prompt for one completion call: instructions, tool
/// catalogue, the format grammar the parser expects back, the question, and
/// the transcript so far.
pub fn build_prompt(question: &str, tools: &ToolRegistry, transcript: &Transcript) -> String {
    let tool_catalogue = tools
        .catalogue()
        .map(|(name, description)| format!("{name}: {description}"))
        .collect::<Vec<_>>()
        .join("\n");
    let tool_names = tools.names().join(", ");
    let scratchpad = transcript.render_scratchpad();

    format!(
        r#"Answer the following questions as best you can. You have access to the following tools:

{tool_catalogue}

Use the tool 'case_insensitive_inventory_query' to query product names in the inventory table using case-insensitive matching.

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Begin!

Question: {question}
Thought:{scratchpad}"#
    )
}
