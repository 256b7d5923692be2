use super::chart::PlotData;
use crate::kernel::state::InteractionState;
use crate::kernel::suggestions::suggestions;
use crate::speech::CaptureState;

pub const WELCOME_QUESTION: &str = "What can I help you with?";
pub const LOADING_TEXT: &str = "Generating...";

/// PURE FUNCTION: renders the visible interaction state as terminal text.
pub fn render_view(state: &InteractionState, capture: CaptureState) -> String {
    let mut out = String::new();

    if !state.has_sent_first_message() {
        out.push_str(WELCOME_QUESTION);
        out.push('\n');
        for (i, suggestion) in suggestions().iter().enumerate() {
            out.push_str(&format!("  [{}] {} {}\n", i + 1, suggestion.main, suggestion.description));
        }
    }

    if let Some(reference) = state.selected_reference() {
        out.push_str(&format!("(manual: {})\n", reference));
    }

    let mic = match capture {
        CaptureState::Capturing => "Listening...",
        CaptureState::Inactive => "",
    };
    out.push_str(&format!("> {} {}\n", state.input_text(), mic).trim_end());
    out.push('\n');

    if !state.is_idle() {
        out.push_str(LOADING_TEXT);
        out.push('\n');
    }

    if let Some(series) = state.last_telemetry() {
        out.push_str(&PlotData::from_series(series).render());
    } else if let Some(text) = state.last_text_response() {
        out.push_str(text);
        out.push('\n');
    }

    if let Some(error) = state.error_message() {
        out.push_str(error);
        out.push('\n');
    }

    out
}
