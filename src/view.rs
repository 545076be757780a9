use crate::types::ChatRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageNode {
    Message { sender: ChatRole, text: String },
    Typing,
}

/// Append-only list of rendered nodes plus the scroll position of the chat panel.
#[derive(Debug, Clone, Default)]
pub struct MessageView {
    nodes: Vec<MessageNode>,
    /// Lines scrolled up from the bottom; zero means following the newest node.
    scroll_back: u16,
}

impl MessageView {
    pub fn nodes(&self) -> &[MessageNode] {
        &self.nodes
    }

    pub fn push(&mut self, sender: ChatRole, text: &str) {
        self.nodes.push(MessageNode::Message {
            sender,
            text: escape_text(text),
        });
        self.scroll_to_bottom();
    }

    pub fn show_typing(&mut self) {
        if !self.is_typing() {
            self.nodes.push(MessageNode::Typing);
        }
        self.scroll_to_bottom();
    }

    pub fn remove_typing(&mut self) -> bool {
        match self.nodes.iter().position(|node| *node == MessageNode::Typing) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_typing(&self) -> bool {
        self.nodes.contains(&MessageNode::Typing)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.scroll_back = 0;
    }

    pub fn scroll_back(&self) -> u16 {
        self.scroll_back
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }

    /// Sender/text pairs of the real messages, in display order.
    pub fn transcript(&self) -> Vec<(ChatRole, &str)> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                MessageNode::Message { sender, text } => Some((*sender, text.as_str())),
                MessageNode::Typing => None,
            })
            .collect()
    }
}

/// Neutralizes terminal control sequences so that message text cannot
/// restyle or move the cursor. Newlines and tabs are kept.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_control() && character != '\n' && character != '\t' {
            escaped.push_str(&format!("\\u{{{:x}}}", character as u32));
        } else {
            escaped.push(character);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use crate::types::ChatRole;

    use super::{MessageNode, MessageView, escape_text};

    #[test]
    fn escapes_control_sequences_but_keeps_layout() {
        assert_eq!(escape_text("plain <b>text</b>"), "plain <b>text</b>");
        assert_eq!(escape_text("a\nb\tc"), "a\nb\tc");
        assert_eq!(escape_text("\u{1b}[31mred"), "\\u{1b}[31mred");
        assert_eq!(escape_text("bell\u{7}"), "bell\\u{7}");
    }

    #[test]
    fn typing_placeholder_is_single_instance() {
        let mut view = MessageView::default();
        view.push(ChatRole::User, "hello");
        view.show_typing();
        view.show_typing();

        assert_eq!(
            view.nodes()
                .iter()
                .filter(|node| **node == MessageNode::Typing)
                .count(),
            1
        );

        assert!(view.remove_typing());
        assert!(!view.remove_typing());
        assert_eq!(view.transcript(), vec![(ChatRole::User, "hello")]);
    }

    #[test]
    fn insertion_returns_to_bottom() {
        let mut view = MessageView::default();
        view.push(ChatRole::Bot, "greeting");
        view.scroll_up(5);
        assert_eq!(view.scroll_back(), 5);

        view.push(ChatRole::User, "hi");
        assert_eq!(view.scroll_back(), 0);
    }
}
