//! Execution context for command invocations.

use std::any::{Any, TypeId};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use chatcmd_types::BudgetExhausted;

use super::CommandRef;
use crate::interpreter::{ArgumentFrames, ComplexityBudget, Unlimited};

/// State carried through one invocation of a command line.
///
/// The context is handed by `&mut` to every command in the call tree. It holds
/// what the surrounding application wants commands to see (caller identity,
/// client handles, ...) as type-keyed extensions, plus the interpreter state
/// shared across the call tree: argument frames of running aliases and the
/// complexity budget.
pub struct ExecContext {
    frames: ArgumentFrames,
    budget: Box<dyn ComplexityBudget>,
    admin: OnceCell<bool>,
    admin_check: Option<Box<dyn Fn() -> bool>>,
    extensions: HashMap<TypeId, Box<dyn Any>>,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecContext {
    /// A context without extensions and with an unlimited budget.
    pub fn new() -> Self {
        Self {
            frames: ArgumentFrames::new(),
            budget: Box::new(Unlimited),
            admin: OnceCell::new(),
            admin_check: None,
            extensions: HashMap::new(),
        }
    }

    /// Replace the complexity budget.
    pub fn with_budget(mut self, budget: impl ComplexityBudget + 'static) -> Self {
        self.budget = Box::new(budget);
        self
    }

    /// Set how the admin flag is computed. The check runs at most once, on first use.
    pub fn with_admin_check(mut self, check: impl Fn() -> bool + 'static) -> Self {
        self.admin = OnceCell::new();
        self.admin_check = Some(Box::new(check));
        self
    }

    /// Whether the caller is an admin. False when no check was configured.
    pub fn is_admin(&self) -> bool {
        *self
            .admin
            .get_or_init(|| self.admin_check.as_ref().is_some_and(|check| check()))
    }

    /// Store an extension value, returning the previous value of that type.
    pub fn insert<T: Any>(&mut self, value: T) -> Option<T> {
        self.extensions
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Look up an extension value by type.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Look up an extension value by type, mutably.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.extensions
            .get_mut(&TypeId::of::<T>())
            .and_then(|value| value.downcast_mut::<T>())
    }

    /// Take `tokens` from the complexity budget.
    pub fn consume(&mut self, tokens: u32) -> Result<(), BudgetExhausted> {
        self.budget.consume(tokens)
    }

    /// Tokens left, if the budget is bounded.
    pub fn remaining_budget(&self) -> Option<u32> {
        self.budget.remaining()
    }

    /// Push an argument frame. The frame is popped when the guard drops.
    pub fn enter_frame(&mut self, args: Vec<CommandRef>) -> FrameGuard<'_> {
        self.frames.push(args);
        FrameGuard {
            ctx: self,
            restore: Restore::Pop,
        }
    }

    /// Arguments of the innermost running alias.
    pub fn current_frame(&self) -> Option<&[CommandRef]> {
        self.frames.current()
    }

    /// Number of running alias calls.
    pub fn frame_depth(&self) -> usize {
        self.frames.depth()
    }

    /// Run `f` with the innermost frame hidden, so `f` sees the frames of the
    /// alias's caller. The frame is put back afterwards.
    pub fn with_outer_frame<R>(&mut self, f: impl FnOnce(&mut ExecContext) -> R) -> R {
        let restore = match self.frames.pop() {
            Some(frame) => Restore::Push(frame),
            None => Restore::Nothing,
        };
        let mut guard = FrameGuard { ctx: self, restore };
        f(&mut *guard)
    }
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("frames", &self.frames)
            .field("budget", &self.budget.remaining())
            .field("admin", &self.admin.get())
            .field("extensions", &self.extensions.len())
            .finish()
    }
}

enum Restore {
    Pop,
    Push(Vec<CommandRef>),
    Nothing,
}

/// Scoped change to the frame stack, undone on drop (including on `?` returns).
pub struct FrameGuard<'a> {
    ctx: &'a mut ExecContext,
    restore: Restore,
}

impl Deref for FrameGuard<'_> {
    type Target = ExecContext;

    fn deref(&self) -> &ExecContext {
        self.ctx
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut ExecContext {
        self.ctx
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        match std::mem::replace(&mut self.restore, Restore::Nothing) {
            Restore::Pop => {
                self.ctx.frames.pop();
            }
            Restore::Push(frame) => self.ctx.frames.push(frame),
            Restore::Nothing => {}
        }
    }
}
