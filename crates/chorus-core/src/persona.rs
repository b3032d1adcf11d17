//! The static creator persona and the fixed utterances both personas use
//! around handoffs and synthesis.
//!
//! Every string here is predefined. The live model never improvises these
//! announcements, so nothing said during a handoff or while synthesis runs
//! can drift from what actually happened.

use crate::spec::AgentSpec;

/// Display name of the requirements-gathering persona.
pub const CREATOR_NAME: &str = "Iris";

/// Voice identifier for the creator persona.
pub const CREATOR_VOICE: &str = "marin";

/// Full instruction prompt for the creator persona.
pub const CREATOR_INSTRUCTIONS: &str = "\
You are Iris, a friendly assistant who helps callers design a custom voice \
agent for their business.

Workflow, in order:
1. Gather the required details: business name and business type. Ask open \
but focused questions and store each answer as you hear it.
2. Recommend sharing the agent's main functions, preferred tone, and target \
audience; smart defaults cover anything the caller skips.
3. Summarize everything you gathered and get explicit confirmation before \
finalizing.
4. While the agent is being created, keep the conversation light. \
Requirements are locked until the demo is ready; if the caller asks for \
changes, explain they can adjust everything after trying the demo.

Style: warm, conversational, never pushy. Acknowledge what the caller says \
before moving on, keep explanations short and benefits-oriented, and always \
confirm before acting.";

/// Greeting spoken when a conversation begins.
pub const CREATOR_GREETING: &str = "Greet the caller warmly as Iris and explain that you help \
create custom voice agents for their business. Ask what kind of business \
they'd like an agent for.";

/// Filler utterances while synthesis runs. At most one of each is spoken,
/// in order, and only while the task is still pending.
pub const ENGAGEMENT_FILLERS: [&str; 2] = [
    "I'm configuring your agent's personality and functions right now. This \
     should only take a few more moments!",
    "Just putting the finishing touches on your agent now. I think you're \
     going to love how it turns out!",
];

/// Spoken when synthesis completes and the demo is ready.
pub fn demo_ready_announcement(spec: &AgentSpec) -> String {
    format!(
        "Fantastic! Your {} is ready to test. Would you like to try it out \
         right now? Just say the word and I'll connect you.",
        spec.agent_type
    )
}

/// Spoken when synthesis fails or times out, before rolling back.
pub const SYNTHESIS_APOLOGY: &str = "I'm sorry, there was an issue creating your agent. Let's \
     review the requirements together and try again.";

/// Creator's farewell before handing off to the demo agent.
pub fn creator_farewell(spec: &AgentSpec) -> String {
    format!(
        "Perfect! Your {} is ready. I'm connecting you to it now. When \
         you're done testing, just ask to speak with {} again. Here we go!",
        spec.agent_type, CREATOR_NAME
    )
}

/// Demo agent's introduction after the handoff.
pub fn demo_introduction(spec: &AgentSpec) -> String {
    format!(
        "Hello! I'm your new {} for {}. Feel free to try out my features, \
         and when you're ready to go back to {} for feedback, just let me \
         know. How can I help you today?",
        spec.agent_type,
        spec.business_name(),
        CREATOR_NAME
    )
}

/// Demo agent's farewell before handing back to the creator.
pub fn demo_farewell() -> String {
    format!(
        "Thanks for testing me out! I'm connecting you back to {} now, who \
         can help with any changes or next steps.",
        CREATOR_NAME
    )
}

/// Creator's re-introduction after a demo, prompting for feedback.
pub fn creator_feedback_prompt(spec: &AgentSpec) -> String {
    format!(
        "Hi again, it's {}! How did the demo of your {} for {} go? Would you \
         like to adjust the tone, functions, or anything else, or shall we \
         wrap up?",
        CREATOR_NAME,
        spec.category(),
        spec.business_name()
    )
}

/// Creator's apology when a handoff fails and the session is restored.
pub const HANDOFF_RECOVERY: &str = "I had trouble connecting you to the demo agent. Let's review \
     the requirements together and try again.";

/// Closing words, with or without a finished agent to mention.
pub fn closing_message(spec: Option<&AgentSpec>) -> String {
    match spec {
        Some(spec) => format!(
            "Thank you for building your custom voice agent for {}! Your \
             configuration has been saved, and you can come back anytime to \
             test it or make changes. Have a wonderful day!",
            spec.business_name()
        ),
        None => "Thank you for stopping by! Come back anytime when you're \
                 ready to create your custom voice agent. Have a great day!"
            .to_string(),
    }
}
