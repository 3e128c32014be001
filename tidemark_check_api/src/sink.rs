use tidemark_api::{LineKind, Message, MessageLine, Patch, PatchLine, Severity};

/// Which line of a patch a message is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// First added line, else the first line of the patch.
    First,
    /// Last added line, else the last line of the patch.
    Last,
    /// A specific index within [`Patch::lines`].
    Position(usize),
}

/// Append-only collection of the messages produced by one check.
#[derive(Debug)]
pub struct MessageSink {
    check: &'static str,
    messages: Vec<Message>,
}

impl MessageSink {
    /// Create an empty sink attributing messages to `check`.
    #[must_use]
    pub const fn new(check: &'static str) -> Self {
        Self {
            check,
            messages: Vec::new(),
        }
    }

    /// Attach a message to a single patch.
    pub fn add(&mut self, patch: &Patch, anchor: Anchor, severity: Severity, text: impl Into<String>) {
        self.messages.push(Message::new(
            patch.path(),
            resolve(patch, anchor),
            severity,
            text,
            self.check,
        ));
    }

    /// Attach the same message to each patch, in order.
    pub fn add_each<'p, I>(&mut self, patches: I, anchor: Anchor, severity: Severity, text: &str)
    where
        I: IntoIterator<Item = &'p Patch>,
    {
        for patch in patches {
            self.add(patch, anchor, severity, text);
        }
    }

    /// Messages collected so far.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of collected messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consume the sink, yielding its messages in insertion order.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

fn resolve(patch: &Patch, anchor: Anchor) -> MessageLine {
    let found = match anchor {
        Anchor::First => patch
            .positioned_lines()
            .find(|(_, line)| line.kind == LineKind::Addition)
            .or_else(|| patch.positioned_lines().next()),
        Anchor::Last => patch
            .positioned_lines()
            .filter(|(_, line)| line.kind == LineKind::Addition)
            .last()
            .or_else(|| patch.positioned_lines().last()),
        Anchor::Position(position) => patch.lines().nth(position).map(|line| (position, line)),
    };

    found.map_or(MessageLine::Virtual, |(position, line)| at(position, line))
}

const fn at(position: usize, line: &PatchLine) -> MessageLine {
    MessageLine::At {
        position,
        base_line: line.base_line,
        head_line: line.head_line,
    }
}
