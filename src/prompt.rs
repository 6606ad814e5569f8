//! Fixed-template prompts for memo generation and revision.

use crate::storage::{MemoField, MemoRow};

/// System role for the generate operation.
pub const GENERATE_SYSTEM: &str = "You are a professional business document writer.";

/// System role for the update operation.
pub const REVISE_SYSTEM: &str = "You are a professional memorandum writer.";

/// Instruction to draft a fresh three-section memo on `subject`.
pub fn generation_prompt(subject: &str) -> String {
    format!(
        "You are tasked with drafting a formal memo for the bank based on the subject: '{subject}'.\n\
         The memo should strictly include the following three sections, formatted as follows:\n\
         \n\
         ### 1. Background\n\
         Provide a detailed overview of the context and relevant background information that led to the necessity of this memo.\n\
         \n\
         ### 2. Proposal\n\
         Present the proposed course of action, addressing key objectives and strategies.\n\
         \n\
         ### 3. Recommendation\n\
         Offer actionable recommendations based on the analysis in the Background and Proposal sections.\n\
         \n\
         Do not include any additional sections such as 'To', 'From', 'Subject', or 'Objective'.\n\
         Ensure the content is concise, formal, and professional."
    )
}

/// Instruction to revise one section of an existing memo while staying
/// consistent with the other two and the subject.
pub fn revision_prompt(memo: &MemoRow, field: MemoField, instruction: &str) -> String {
    let field = field.as_str();
    format!(
        "The subject of this memo is: '{subject}'.\n\
         \n\
         Current sections of the memo are as follows:\n\
         ### 1. Background\n\
         {background}\n\
         \n\
         ### 2. Proposal\n\
         {proposal}\n\
         \n\
         ### 3. Recommendation\n\
         {recommendation}\n\
         \n\
         Update the '{field}' section only by making changes with {instruction}. \
         Ensure the updated content aligns with the context of the other sections and the subject. \
         Provide only the content for the '{field}' section.",
        subject = memo.subject,
        background = memo.background,
        proposal = memo.proposal,
        recommendation = memo.recommendation,
    )
}
