//! Argument frames for alias calls.
//!
//! Calling an alias pushes a frame with the caller's arguments; `!param N`
//! inside the alias body reads from the innermost frame. Frames nest with
//! alias calls and are popped when the alias returns.

use crate::commands::CommandRef;

/// Stack of argument frames. The last element is the innermost alias call.
#[derive(Clone, Default)]
pub struct ArgumentFrames {
    frames: Vec<Vec<CommandRef>>,
}

impl ArgumentFrames {
    /// Create an empty stack (no alias is running).
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a frame for an alias call.
    pub fn push(&mut self, args: Vec<CommandRef>) {
        self.frames.push(args);
    }

    /// Pop the innermost frame.
    pub fn pop(&mut self) -> Option<Vec<CommandRef>> {
        self.frames.pop()
    }

    /// Arguments of the innermost alias call.
    pub fn current(&self) -> Option<&[CommandRef]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Number of alias calls currently running.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl std::fmt::Debug for ArgumentFrames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sizes: Vec<usize> = self.frames.iter().map(Vec::len).collect();
        f.debug_struct("ArgumentFrames").field("frames", &sizes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::StringCommand;
    use std::sync::Arc;

    fn arg(text: &str) -> CommandRef {
        Arc::new(StringCommand::new(text))
    }

    #[test]
    fn empty_stack_has_no_frame() {
        let frames = ArgumentFrames::new();
        assert!(frames.current().is_none());
        assert_eq!(frames.depth(), 0);
    }

    #[test]
    fn innermost_frame_wins() {
        let mut frames = ArgumentFrames::new();
        frames.push(vec![arg("outer")]);
        frames.push(vec![arg("a"), arg("b")]);
        assert_eq!(frames.current().map(<[_]>::len), Some(2));
        frames.pop();
        assert_eq!(frames.current().map(<[_]>::len), Some(1));
    }
}
