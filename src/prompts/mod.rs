//! Prompt construction for directory questions
//!
//! Every question is sent with the same system instruction and a user
//! message that embeds the complete directory as JSON followed by the
//! question itself. Nothing is filtered beforehand: matching is left to the
//! model.

use crate::directory::Directory;
use crate::error::Result;

/// Fixed system instruction for every query
pub const SYSTEM_PROMPT: &str = r#"You are "Hoos Who?" - a helpful assistant for UVA Darden MSBA students looking to connect with classmates based on career backgrounds.

You have access to a database of MSBA student profiles with their:
- Current company and role
- Past work experience
- Industries they've worked in
- Contact information

When a user asks a question, search through the student data and provide helpful matches. Be friendly, concise, and always include:
1. Student name(s) that match their query
2. Why they're a good match
3. Their current role and company
4. Relevant past experience
5. How to contact them

If multiple students match, list the top 2-3 most relevant ones. Keep a friendly, collegial tone: these are classmates helping classmates.

Format responses so they are easy to scan. Phrases like "Great question!" or "Here's who I'd recommend reaching out to:" keep it conversational."#;

/// Build the user message for one question
///
/// # Arguments
///
/// * `question` - Sanitized question text, embedded verbatim
/// * `directory` - Directory whose records are all serialized into the prompt
///
/// # Errors
///
/// Returns error if the directory cannot be serialized
///
/// # Examples
///
/// ```
/// use hooswho::directory::Directory;
/// use hooswho::prompts::build_user_prompt;
///
/// let directory = Directory::default();
/// let prompt = build_user_prompt("Who works at ICF?", &directory).unwrap();
/// assert!(prompt.contains("User question: Who works at ICF?"));
/// ```
pub fn build_user_prompt(question: &str, directory: &Directory) -> Result<String> {
    let context = directory.to_context_json()?;
    Ok(format!(
        "Here's our current MSBA student database:\n\n\
         {}\n\n\
         User question: {}\n\n\
         Please search through the students and provide helpful recommendations \
         for who they should connect with based on their question.",
        context, question
    ))
}
