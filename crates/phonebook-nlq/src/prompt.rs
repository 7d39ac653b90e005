//! Prompt construction for natural-language queries.

use crate::{ChatMessage, SchemaDescription};

/// Build the system instruction: the schema plus the safety directive.
pub fn system_message(schema: &SchemaDescription) -> String {
  format!(
    "Given the following SQL tables in {dialect}, your job is to write safe queries given a \
     user's request.\n\
     Only write a single read-only SELECT statement. Never insert, update, delete or alter \
     anything, and never write SQL that is open to injection: every value taken from the \
     request must be a named placeholder such as :person_id, never a literal in the SQL.\n\n\
     {ddl}",
    dialect = schema.dialect,
    ddl = schema.to_ddl(),
  )
}

/// Build the user turn asking for a fenced SQL block and a fenced JSON block.
pub fn user_message(schema: &SchemaDescription, question: &str) -> String {
  format!(
    "For the following question, write a valid {dialect} SQL query with named placeholders \
     for parameters inside a ```sql block, and provide the parameter values separately as a \
     flat JSON object inside a ```json block: {question}",
    dialect = schema.dialect,
  )
}

pub fn messages(schema: &SchemaDescription, question: &str) -> Vec<ChatMessage> {
  vec![
    ChatMessage::system(system_message(schema)),
    ChatMessage::user(user_message(schema, question)),
  ]
}
