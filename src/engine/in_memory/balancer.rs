use crate::handler::SharedHandler;

/// Round-robin state of one queue group.
#[derive(Default)]
pub(super) struct RoundRobin {
    pub(super) members: Vec<SharedHandler>,
    pub(super) cursor: usize,
}

impl RoundRobin {
    pub(super) fn join(&mut self, handler: SharedHandler) {
        self.members.push(handler);
    }

    /// Member whose turn it is, advancing the cursor.
    ///
    /// An empty group yields nothing and leaves the cursor alone. A cursor
    /// left past the end (the group shrank) starts over at the first member.
    pub(super) fn next(&mut self) -> Option<SharedHandler> {
        if self.members.is_empty() {
            return None;
        }
        if self.cursor >= self.members.len() {
            self.cursor = 0;
        }
        let member = self.members[self.cursor].clone();
        self.cursor += 1;
        Some(member)
    }

    pub(super) fn len(&self) -> usize {
        self.members.len()
    }
}
