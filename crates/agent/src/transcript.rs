/// One think/act/observe step. Malformed completions produce a step with no
/// action; the raw completion text lands in `thought` and the corrective
/// message in `observation`.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub thought: String,
    pub action: Option<String>,
    pub action_input: Option<String>,
    pub observation: Option<String>,
}

/// Append-only history for a single question. One transcript per invocation
/// of the loop; dropped when the loop terminates.
#[derive(Debug, Default)]
pub struct Transcript {
    steps: Vec<Step>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Scratchpad text placed after the trailing `Thought:` cue in the
    /// prompt, so each completed step reads back in the same grammar the
    /// model is asked to produce.
    pub fn render_scratchpad(&self) -> String {
        let mut rendered = String::new();

        for step in &self.steps {
            rendered.push_str(step.thought.trim());
            if let (Some(action), Some(input)) = (&step.action, &step.action_input) {
                rendered.push_str("\nAction: ");
                rendered.push_str(action);
                rendered.push_str("\nAction Input: ");
                rendered.push_str(input);
            }
            if let Some(observation) = &step.observation {
                rendered.push_str("\nObservation: ");
                rendered.push_str(observation);
                rendered.push_str("\nThought: ");
            }
        }

        rendered
    }
}
