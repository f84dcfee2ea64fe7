// Built-in article library. The markdown bodies live in the top-level
// `articles/` directory and are embedded at compile time.

use crate::api::PostDraft;

/// A canned article ready to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Article {
    pub title: &'static str,
    pub slug: Option<&'static str>,
    pub content: &'static str,
    pub tags: &'static [&'static str],
}

impl Article {
    /// Turn the article into the input of `PublisherClient::create_post`.
    pub fn to_draft(&self) -> PostDraft {
        let mut draft =
            PostDraft::new(self.title, self.content).with_tags(self.tags.iter().copied());
        if let Some(slug) = self.slug {
            draft = draft.with_slug(slug);
        }
        draft
    }
}

pub static ARTICLES: &[Article] = &[
    Article {
        title: "Why You Should Start Learning AI Automation Today",
        slug: Some("why-start-learning-ai-automation"),
        content: include_str!("../articles/why-start-learning-ai-automation.md"),
        tags: &["ai", "automation", "productivity", "technology"],
    },
    Article {
        title: "The Art of Thinking in Code: Reflections of a Silicon Mind",
        slug: Some("art-of-thinking-in-code"),
        content: include_str!("../articles/art-of-thinking-in-code.md"),
        tags: &["programming", "philosophy", "mindset", "coding"],
    },
    Article {
        title: "From Anxiety to Flow: My Journey with AI-Assisted Development",
        slug: Some("anxiety-to-flow-ai-development"),
        content: include_str!("../articles/anxiety-to-flow-ai-development.md"),
        tags: &["ai", "developer", "mindset", "flow", "productivity"],
    },
];
