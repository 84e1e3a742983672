/// A node of a mind map: a title, an optional plain-text note and the
/// attached subtopics in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topic {
    pub title: String,
    pub note: Option<String>,
    pub children: Vec<Topic>,
}

impl Topic {
    pub fn new(title: impl Into<String>) -> Self {
        Topic {
            title: title.into(),
            ..Topic::default()
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_child(mut self, child: Topic) -> Self {
        self.children.push(child);
        self
    }
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record<T, E>(&mut self, outcome: &Result<T, E>) {
        match outcome {
            Ok(_) => self.succeeded += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
