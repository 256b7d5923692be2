/// A canned prompt starter: the text that seeds the input, plus a hint shown beside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub main: &'static str,
    pub description: &'static str,
}

pub const SUGGESTIONS: [Suggestion; 3] = [
    Suggestion { main: "How do I start", description: "[specific task]?" },
    Suggestion { main: "Can you guide me through", description: "[process]?" },
    Suggestion { main: "How do I fix", description: "[issue/error]?" },
];

pub fn suggestions() -> &'static [Suggestion] {
    &SUGGESTIONS
}

/// Text that selecting suggestion `index` puts in the input field.
pub fn seed_text(index: usize) -> Option<&'static str> {
    SUGGESTIONS.get(index).map(|s| s.main)
}
