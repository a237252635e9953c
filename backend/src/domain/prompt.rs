//! Deterministic prompt construction for the caption provider.
//!
//! The builder is a pure function of the validated request: no randomness and
//! no timestamps, so identical requests always produce identical instructions.

use std::fmt::Write as _;

use super::generation::{DEFAULT_TARGET_AUDIENCE, GenerationRequest};

/// Instruction pair sent to the chat-completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_INSTRUCTION: &str = "You are an expert Instagram and TikTok caption writer. \
You specialize in creating engaging, scroll-stopping captions for carousel posts. \
Generate captions that are authentic, engaging, and optimized for social media engagement.";

/// Render the validated request into provider instructions.
pub fn build_prompt(request: &GenerationRequest) -> Prompt {
    let slide_count = request.slide_count();
    let audience = request
        .target_audience()
        .unwrap_or(DEFAULT_TARGET_AUDIENCE);

    let mut user = String::new();
    let _ = writeln!(
        user,
        "Create {slide_count} captions for an Instagram carousel about: \"{topic}\"",
        topic = request.topic()
    );
    let _ = writeln!(user);
    let _ = writeln!(user, "Tone: {tone}", tone = request.tone());
    let _ = writeln!(user, "Target Audience: {audience}");
    let _ = writeln!(
        user,
        "Content Type: {content_type}",
        content_type = request.content_type()
    );
    let _ = writeln!(user);
    let _ = writeln!(user, "Requirements:");
    let _ = writeln!(
        user,
        "- Slide 1: Create a HOOK that stops scrolling. Use emojis strategically. \
         Make it curiosity-driven."
    );
    let _ = writeln!(
        user,
        "- Slides 2-{interior_end}: Informative, valuable content. Each slide should flow naturally.",
        interior_end = slide_count - 1
    );
    let _ = writeln!(
        user,
        "- Slide {slide_count}: Strong CTA (call-to-action) that encourages engagement \
         (save, share, comment, follow)."
    );
    let _ = writeln!(
        user,
        "- Keep captions concise (under 100 characters per slide when possible)"
    );
    let _ = writeln!(user, "- Use line breaks for readability");
    let _ = writeln!(user, "- Include relevant emojis");
    let _ = writeln!(
        user,
        "- At the end, suggest 10-15 relevant hashtags (mix of popular and niche)"
    );
    let _ = writeln!(user);
    let _ = writeln!(user, "Return the response in this exact JSON format:");
    let _ = writeln!(user, "{{");
    let _ = writeln!(
        user,
        "  \"captions\": [\"Slide 1 caption here\", \"Slide 2 caption here\", ...],"
    );
    let _ = writeln!(user, "  \"hashtags\": [\"hashtag1\", \"hashtag2\", ...],");
    let _ = writeln!(
        user,
        "  \"tips\": \"Brief tip about using these captions effectively\""
    );
    let _ = write!(user, "}}");

    Prompt {
        system: SYSTEM_INSTRUCTION.to_owned(),
        user,
    }
}
