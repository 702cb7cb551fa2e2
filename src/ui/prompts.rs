use anyhow::Result;
use dialoguer::{Input, Select};

/// Interactive confirmation prompt using arrow-key navigable selection
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `accept` - Label of the accepting option (index 0)
/// * `decline` - Label of the declining option (index 1)
///
/// # Returns
/// * `Ok(true)` if user selects `accept`
/// * `Ok(false)` if user selects `decline`
pub fn prompt_confirmation(prompt: &str, accept: &str, decline: &str) -> Result<bool> {
    let items = vec![accept, decline];

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(selection == 0)
}

pub fn prompt_acknowledge(prompt: &str, button: &str) -> Result<()> {
    Select::new()
        .with_prompt(prompt)
        .items(&[button])
        .default(0)
        .interact()?;
    Ok(())
}

/// Free text prompt; an empty answer counts as cancelling
pub fn prompt_text(prompt: &str, placeholder: Option<&str>) -> Result<Option<String>> {
    let mut input = Input::<String>::new().with_prompt(prompt).allow_empty(true);
    if let Some(placeholder) = placeholder {
        input = input.default(placeholder.to_string()).show_default(true);
    }

    let text = input.interact_text()?;
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}
