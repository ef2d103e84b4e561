use crate::domain::entities::chat_session::Exchange;

const CONDENSE_TEMPLATE: &str = "\
Given the following conversation and a follow up question, rephrase the follow up question
to be a standalone question that captures all relevant context from the chat history.
If the follow up question is asking for clarification about a previous response,
make sure to include relevant details from the previous interaction.

Chat History:
{chat_history}

Follow Up Input: {question}
Standalone Question:";

const QA_TEMPLATE: &str = "\
You are an AI assistant specializing in insurance policies. Use the following pieces of
context to answer the question at the end. If you don't know the answer, just say that
you don't know, don't try to make up an answer.

When answering:
1. If this is a follow-up question, reference relevant information from previous responses
2. Be specific about which parts of the policy you're referencing
3. If there are related topics that might be helpful, mention them briefly
4. If you need clarification, ask specific follow-up questions

Context: {context}

Current Question: {question}

Chat History:
{chat_history}

Answer the question in a clear and helpful manner. If you're referencing specific policy
details, indicate where this information comes from.";

/// `Human: ...` / `Assistant: ...` lines, oldest exchange first.
pub fn render_chat_history(history: &[Exchange]) -> String {
    history
        .iter()
        .map(|exchange| format!("Human: {}\nAssistant: {}", exchange.question, exchange.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn condense_prompt(history: &[Exchange], question: &str) -> String {
    let chat_history = render_chat_history(history);
    fill(
        CONDENSE_TEMPLATE,
        &[("chat_history", chat_history.as_str()), ("question", question)],
    )
}

/// Passages are joined with blank lines into `{context}`.
pub fn qa_prompt(passages: &[&str], question: &str, history: &[Exchange]) -> String {
    let context = passages.join("\n\n");
    let chat_history = render_chat_history(history);
    fill(
        QA_TEMPLATE,
        &[
            ("context", context.as_str()),
            ("question", question),
            ("chat_history", chat_history.as_str()),
        ],
    )
}

/// Substitutes `{name}` placeholders in one left-to-right pass over the
/// template. Inserted values are never scanned again.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut prompt = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        prompt.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match value {
            Some((value, close)) => {
                prompt.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                prompt.push('{');
                rest = after;
            }
        }
    }

    prompt.push_str(rest);
    prompt
}
