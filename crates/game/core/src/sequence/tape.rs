//! A single named tape and its cursor.

use bitflags::bitflags;

use super::Instruction;

bitflags! {
    /// Per-sequence behavior flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SequenceFlags: u8 {
        /// Keep advancing even when nobody is watching.
        const NONSTOP = 1 << 0;
        /// Belongs to a fight; dropped when the owner disengages.
        const COMBAT = 1 << 1;
    }
}

/// Named instruction tape with a cursor into it.
///
/// Invariant: `cursor <= tape.len()`. When they are equal the sequence is
/// exhausted until refilled.
#[derive(Clone, Debug)]
pub struct Sequence {
    name: String,
    flags: SequenceFlags,
    tape: Vec<Instruction>,
    cursor: usize,
}

impl Sequence {
    pub(crate) fn new(name: &str, flags: SequenceFlags) -> Self {
        Self {
            name: name.to_owned(),
            flags,
            tape: Vec::new(),
            cursor: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> SequenceFlags {
        self.flags
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tape.is_empty()
    }

    /// Unconsumed remainder of the tape.
    pub fn remaining(&self) -> &[Instruction] {
        &self.tape[self.cursor..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.tape.len()
    }

    pub(crate) fn is_nonstop(&self) -> bool {
        self.flags.contains(SequenceFlags::NONSTOP)
    }

    /// Drops the consumed prefix so the tape does not grow without bound.
    fn compact(&mut self) {
        if self.cursor > 0 {
            self.tape.drain(..self.cursor);
            self.cursor = 0;
        }
    }

    pub(crate) fn push_front(&mut self, instructions: Vec<Instruction>) {
        self.compact();
        self.tape.splice(0..0, instructions);
    }

    pub(crate) fn push_back(&mut self, instructions: Vec<Instruction>) {
        self.compact();
        self.tape.extend(instructions);
    }

    pub(crate) fn clear(&mut self) {
        self.tape.clear();
        self.cursor = 0;
    }

    pub(crate) fn current(&self) -> Option<&Instruction> {
        self.tape.get(self.cursor)
    }

    pub(crate) fn advance(&mut self) {
        debug_assert!(self.cursor < self.tape.len(), "cursor past end of tape");
        self.cursor += 1;
    }

    /// Replaces the current instruction with `replacement`, cursor unchanged.
    pub(crate) fn replace_current(&mut self, replacement: Vec<Instruction>) {
        let at = self.cursor;
        self.tape.splice(at..=at, replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(seq: &Sequence) -> Vec<&str> {
        seq.remaining()
            .iter()
            .filter_map(Instruction::as_command)
            .collect()
    }

    #[test]
    fn push_front_lands_at_head_of_remainder() {
        let mut seq = Sequence::new("s", SequenceFlags::empty());
        seq.push_back(vec!["a".into(), "b".into()]);
        seq.advance();
        seq.push_front(vec!["x".into()]);

        assert_eq!(seq.cursor(), 0);
        assert_eq!(commands(&seq), ["x", "b"]);
    }

    #[test]
    fn replace_current_keeps_cursor() {
        let mut seq = Sequence::new("s", SequenceFlags::empty());
        seq.push_back(vec!["a".into(), "b".into()]);
        seq.replace_current(vec![Instruction::Delay(2), "c".into()]);

        assert_eq!(seq.current(), Some(&Instruction::Delay(2)));
        assert_eq!(seq.len(), 3);
    }
}
