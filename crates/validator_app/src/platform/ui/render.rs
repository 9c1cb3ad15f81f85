use validator_core::FormViewModel;

use super::markdown::markdown_to_terminal;

pub const TITLE: &str = "Source Code Validator";
pub const SUBTITLE: &str =
    "Paste your GitHub URL or upload a file to validate your source code.";
pub const SUBMIT_DISABLED_NOTICE: &str =
    "A validation is already in progress; wait for it to finish before submitting again.";

const DIVIDER_WIDTH: usize = 60;

/// Full form: inputs, submission status and the rendered result.
pub fn render_form(view: &FormViewModel) -> String {
    let url = if view.url.is_empty() {
        "(none)"
    } else {
        view.url.as_str()
    };
    let file = view.file_name.as_deref().unwrap_or("(none)");
    let status = if view.submitting {
        "Validating..."
    } else {
        "Ready"
    };
    let divider = "-".repeat(DIVIDER_WIDTH);

    format!(
        "{TITLE}\n{SUBTITLE}\n\nRepository URL: {url}\nRequirements:   {file}\nStatus:         {status}\n{divider}\n{}\n{divider}\n",
        render_result(view)
    )
}

/// Only the result pane, as printed by one-shot runs.
pub fn render_result(view: &FormViewModel) -> String {
    markdown_to_terminal(&view.result)
}
