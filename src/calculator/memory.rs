//! The single last-answer slot.

use super::format::Computed;

#[derive(Clone, Debug, PartialEq)]
pub struct AnswerMemory {
    last: Computed,
}

impl Default for AnswerMemory {
    fn default() -> Self {
        Self {
            last: Computed {
                value: 0.0,
                text: "0".to_string(),
            },
        }
    }
}

impl AnswerMemory {
    /// Record the result of a completed calculation.
    pub fn store(&mut self, computed: &Computed) {
        self.last = computed.clone();
    }

    pub fn last(&self) -> &Computed {
        &self.last
    }

    pub fn text(&self) -> &str {
        &self.last.text
    }
}
