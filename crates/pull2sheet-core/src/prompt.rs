//! Prompt construction and response cleaning.

use pull2sheet_protocols::{FieldDescriptor, FieldValue, InputPayload, Prompt, NOT_AVAILABLE};

/// Separator the model is asked to insert between batch items.
pub const ITEM_DELIMITER: &str = "|||ITEM_SEPARATOR|||";

/// Appended to input cut at the length limit.
pub const TRUNCATION_MARKER: &str = "... [TRUNCATED]";

const TEXT_START: &str = "---START OF TEXT---";
const TEXT_END: &str = "---END OF TEXT---";

/// Cut `text` to `max_chars` characters and append the truncation marker.
///
/// Returns `None` when the text already fits.
pub fn truncate_input(text: &str, max_chars: usize) -> Option<String> {
    let (cut, _) = text.char_indices().nth(max_chars)?;
    Some(format!("{}{}", &text[..cut], TRUNCATION_MARKER))
}

/// Instruction block for one field. Empty hints are left out.
pub fn field_instructions(field: &FieldDescriptor) -> String {
    let mut lines = vec![format!("Extract the value for \"{}\".", field.name)];

    if !field.keywords.trim().is_empty() {
        lines.push(format!(
            "- Look for labels similar to the field name or these keywords: \"{}\".",
            field.keywords
        ));
    }
    if !field.field_type.trim().is_empty() {
        lines.push(format!("- The data type should be a \"{}\".", field.field_type));
    }
    if !field.format.trim().is_empty() {
        lines.push(format!("- The format should be similar to \"{}\".", field.format));
    }

    lines.push(
        "- CRITICAL: Respond with ONLY the extracted value. Do not add explanations or quotes."
            .to_string(),
    );
    lines.push(format!(
        "- If the information is not present, respond with \"{}\".",
        NOT_AVAILABLE
    ));
    lines.join("\n")
}

/// Full prompt for one field against the given input.
pub fn field_prompt(field: &FieldDescriptor, input: &InputPayload) -> Prompt {
    let instructions = field_instructions(field);
    match input {
        InputPayload::Text(text) => Prompt::Text(format!(
            "{instructions}\n{TEXT_START}\n{text}\n{TEXT_END}\nValue:"
        )),
        InputPayload::Image(image) => Prompt::with_image(
            format!("From the image provided: {instructions}\nValue:"),
            image.clone(),
        ),
    }
}

/// Prompt asking the model to mark item boundaries without altering content.
pub fn split_prompt(text: &str) -> Prompt {
    Prompt::Text(format!(
        "The following text contains a list or collection of similar items \
         (e.g., search results, contacts, products). Identify each distinct item and \
         separate them using the unique delimiter \"{ITEM_DELIMITER}\". \
         CRITICAL: Do not change, summarize, or omit any content within each item. \
         Preserve the original text of each item exactly.\n\
         {TEXT_START}\n{text}\n{TEXT_END}"
    ))
}

/// Split a delimited model response into non-blank fragments.
pub fn split_items(response: &str) -> Vec<&str> {
    response
        .split(ITEM_DELIMITER)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

/// Normalize a raw field answer.
///
/// Trims, strips one leading and one trailing double quote, then maps an
/// empty answer or `N/A` (any case) to [`FieldValue::NotFound`].
pub fn clean_response(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    let value = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let value = value.strip_suffix('"').unwrap_or(value);

    if value.is_empty() || value.eq_ignore_ascii_case(NOT_AVAILABLE) {
        FieldValue::NotFound
    } else {
        FieldValue::Found(value.to_string())
    }
}
