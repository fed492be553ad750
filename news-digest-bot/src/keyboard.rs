use crate::types::{Action, InlineButton, InlineKeyboard, Topic};
use std::collections::BTreeSet;

const SELECTED_MARK: &str = "✅ ";
const COMMIT_LABEL: &str = "💾 Save selection";
const BUTTONS_PER_ROW: usize = 2;

/// Builds the full topic menu for the given selection. Rebuilt from scratch
/// on every change.
pub fn build(selected: &BTreeSet<Topic>) -> InlineKeyboard {
    let mut rows: Vec<Vec<InlineButton>> = Topic::ALL
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&topic| InlineButton {
                    label: topic_label(topic, selected.contains(&topic)),
                    action: Action::Toggle(topic),
                })
                .collect()
        })
        .collect();

    rows.push(vec![InlineButton {
        label: COMMIT_LABEL.to_string(),
        action: Action::Commit,
    }]);

    InlineKeyboard { rows }
}

fn topic_label(topic: Topic, selected: bool) -> String {
    if selected {
        format!("{}{}", SELECTED_MARK, topic.label())
    } else {
        topic.label().to_string()
    }
}
