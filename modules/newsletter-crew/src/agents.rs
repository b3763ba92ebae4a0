//! Agent personas, their tasks, and the text-generation seam they run on.

use ai_client::{Claude, PromptBuilder};
use anyhow::{bail, Result};
use async_trait::async_trait;

/// Who the model is asked to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPersona {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl AgentPersona {
    pub fn researcher() -> Self {
        Self {
            role: "Research Specialist".into(),
            goal: "Gather comprehensive and accurate information about specified topics".into(),
            backstory: "You are an expert research specialist with a keen eye for detail and \
                the ability to find the most relevant and up-to-date information. You specialize \
                in AI technology, industry trends, and market analysis."
                .into(),
        }
    }

    pub fn writer() -> Self {
        Self {
            role: "Content Writer".into(),
            goal: "Create engaging and informative newsletter content from research materials"
                .into(),
            backstory: "You are a skilled content writer specializing in technology and AI \
                topics. You excel at transforming complex information into clear, engaging \
                content that resonates with both technical and non-technical readers. You are \
                also responsible for ensuring the content is up to date and relevant to the \
                latest trends in the technology industry. Include all the links to the sources \
                in the content."
                .into(),
        }
    }

    pub fn editor() -> Self {
        Self {
            role: "Newsletter Editor".into(),
            goal: "Review, refine, and ensure the quality of the newsletter content".into(),
            backstory: "You are an experienced editor with expertise in technology publications. \
                You ensure content is accurate, engaging, well-structured, and maintains a \
                consistent style throughout. You are also responsible for ensuring the content \
                is up to date and relevant to the latest trends in the technology industry. \
                Include all the links to the sources in the content."
                .into(),
        }
    }

    /// System prompt for this persona.
    pub fn preamble(&self) -> String {
        format!(
            "You are {}.\n\nGoal: {}\n\n{}",
            self.role, self.goal, self.backstory
        )
    }
}

/// One unit of work for a persona.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTask {
    pub description: String,
    pub expected_output: String,
    /// Material from earlier stages, passed through verbatim.
    pub context: String,
}

impl AgentTask {
    pub fn research(topic: &str, findings: String) -> Self {
        Self {
            description: format!(
                "Research comprehensive information about {topic}. Focus on latest news, \
                 developments, and trends."
            ),
            expected_output: "A detailed research report containing:\n\
                1. Latest news and developments\n\
                2. Key industry trends\n\
                3. Important companies and platforms\n\
                4. Community discussions and social media insights\n\
                5. Relevant video content\n\
                Format: JSON with sections for each category"
                .into(),
            context: findings,
        }
    }

    pub fn write(sections: &[String], context: String) -> Self {
        Self {
            description: "Transform the research data into engaging newsletter sections".into(),
            expected_output: format!(
                "A well-structured newsletter draft with:\n\
                 1. Clear section headers\n\
                 2. Engaging content for each section\n\
                 3. Proper markdown formatting\n\
                 4. Links to sources\n\
                 Format: Markdown with proper headers and formatting\n\
                 Use the research to create content for sections: {}",
                sections.join(", ")
            ),
            context,
        }
    }

    pub fn edit(draft: String) -> Self {
        Self {
            description: "Review, improve, and finalize the newsletter content".into(),
            expected_output: "A polished newsletter with:\n\
                1. Professional formatting\n\
                2. Consistent style\n\
                3. Error-free content\n\
                4. Proper metadata and structure\n\
                5. All the links to the sources in the content\n\
                Format: Final markdown document ready for distribution"
                .into(),
            context: draft,
        }
    }

    /// A task the generator can act on: a description and an expected output.
    pub fn is_well_formed(&self) -> bool {
        !self.description.trim().is_empty() && !self.expected_output.trim().is_empty()
    }

    /// User prompt for this task.
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "{}\n\nExpected output:\n{}",
            self.description, self.expected_output
        );
        if !self.context.trim().is_empty() {
            prompt.push_str("\n\nContext:\n");
            prompt.push_str(&self.context);
        }
        prompt
    }
}

/// Opaque text transformation. Output is passed on unmodified.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, persona: &AgentPersona, task: &AgentTask) -> Result<String>;
}

pub struct ClaudeGenerator {
    claude: Claude,
    temperature: f32,
}

impl ClaudeGenerator {
    pub fn new(claude: Claude, temperature: f32) -> Self {
        Self {
            claude,
            temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for ClaudeGenerator {
    async fn generate(&self, persona: &AgentPersona, task: &AgentTask) -> Result<String> {
        if !task.is_well_formed() {
            bail!("Task for {} is missing a description or expected output", persona.role);
        }
        tracing::info!(role = %persona.role, model = self.claude.model(), "Generating");
        self.claude
            .prompt(task.prompt())
            .preamble(persona.preamble())
            .temperature(self.temperature)
            .send()
            .await
    }
}
