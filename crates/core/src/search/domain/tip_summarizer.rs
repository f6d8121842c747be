/// Canned block used whenever no usable summary exists for a page.
pub const FALLBACK_SNIPPET: &str = "Name: Unknown
Overview: No identifiable personal information found.
Tips for socializing with this person:
- Be friendly
- Ask general questions
- Use open body language
- Show interest
- Smile often";

/// Turns scraped page text into a `Name` / `Overview` / tips block.
pub trait TipSummarizer: Send + Sync {
    fn summarize(&self, text: &str) -> Result<String, Box<dyn std::error::Error>>;
}

/// Instruction sent to the language model for one page of text.
pub fn build_prompt(text: &str) -> String {
    format!(
        "Here is text scraped from a web page:\n\
         \n\
         {text}\n\
         \n\
         Decide whether this text is about one specific real person.\n\
         \n\
         If it is not, reply with exactly this block:\n\
         \n\
         {FALLBACK_SNIPPET}\n\
         \n\
         If it is, reply in exactly this format:\n\
         \n\
         Name: [the person's name, or Unknown]\n\
         Overview: [one or two sentences on who they are: work, notable facts, interests]\n\
         Tips for socializing with this person:\n\
         - [Tip 1]\n\
         - [Tip 2]\n\
         - [Tip 3]\n\
         - [Tip 4]\n\
         - [Tip 5]\n\
         \n\
         Each tip is a short imperative action of at most 30 characters, \
         for example \"Mention machine learning\"."
    )
}

/// A reply is usable only if it carries a `Name:` line.
pub fn is_well_formed(reply: &str) -> bool {
    reply
        .lines()
        .any(|l| l.trim().trim_start_matches("**").starts_with("Name:"))
}
