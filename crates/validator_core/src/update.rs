use crate::{Effect, FormState, Msg, ValidationOutcome, FAILURE_MESSAGE, SUCCESS_FALLBACK};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FormState, msg: Msg) -> (FormState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlChanged(url) => {
            state.set_url(url);
            Vec::new()
        }
        Msg::FileChosen(file) => {
            state.set_file(file);
            Vec::new()
        }
        Msg::SubmitClicked => match state.begin_submission() {
            Some((request_id, payload)) => vec![Effect::SubmitValidation {
                request_id,
                payload,
            }],
            // Resubmission is disabled while a request is in flight.
            None => Vec::new(),
        },
        Msg::ValidationSettled {
            request_id,
            outcome,
        } => {
            state.settle(request_id, display_text(outcome));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn display_text(outcome: ValidationOutcome) -> String {
    match outcome {
        ValidationOutcome::Accepted { message } => message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| SUCCESS_FALLBACK.to_string()),
        ValidationOutcome::Failed => FAILURE_MESSAGE.to_string(),
    }
}
