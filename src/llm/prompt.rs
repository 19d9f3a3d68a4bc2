//! Prompt construction
//!
//! Builds the request sent to the model: the live schema listing, the
//! user's question, and the response layout the parser expects.

use crate::llm::provider::Message;

/// System instructions shared by every request
const SYSTEM_PROMPT: &str = "You are an AI assistant tasked with converting user queries into SQL statements.";

/// Build the single user message for a question.
///
/// The response layout requested here is the one
/// [`parse_response`](crate::llm::parser::parse_response) understands.
pub fn build_sql_prompt(schema_context: &str, question: &str) -> String {
    let schema_context = if schema_context.trim().is_empty() {
        "(no tables loaded)"
    } else {
        schema_context
    };

    format!(
        "The database uses SQLite and contains the following tables:\n\
         {schema}\n\n\
         User Query: \"{question}\"\n\n\
         Please respond with the SQL query wrapped in a code block as follows:\n\n\
         ```sql\n\
         -- SQL query here\n\
         ```\n\n\
         Then respond with the explanation wrapped in a block as follows:\n\
         '''explanation\n\
         === explanation here\n\
         '''\n",
        schema = schema_context,
        question = question.trim(),
    )
}

/// Messages for a text-to-SQL request
pub fn sql_messages(schema_context: &str, question: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(build_sql_prompt(schema_context, question)),
    ]
}
