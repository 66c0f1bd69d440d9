use std::{mem, rc::Rc};

use crate::common::{
    data::Data,
    env::Env,
    opcode::Inst,
};

/// The call stack: a reference to the top frame, if any.
/// Frames are never mutated once pushed,
/// so a stack captured by a continuation stays valid
/// however far the VM has unwound past it since.
pub type Stack = Option<Rc<Frame>>;

/// A saved call site, linked to the frame below it.
pub struct Frame {
    /// Where to resume once the callee returns.
    pub ret: Rc<Inst>,
    /// The caller's environment.
    pub env: Env,
    /// The caller's pending arguments.
    pub args: Vec<Data>,
    pub parent: Stack,
    depth: usize,
}

impl Frame {
    /// Pushes a frame on top of `stack`, returning the new top.
    pub fn push(stack: Stack, ret: Rc<Inst>, env: Env, args: Vec<Data>) -> Rc<Frame> {
        let depth = Frame::depth(&stack) + 1;
        Rc::new(Frame { ret, env, args, parent: stack, depth })
    }

    /// Pops the top frame, returning its contents and the rest of the stack.
    /// Frames still shared with a continuation are copied, not taken.
    pub fn pop(frame: Rc<Frame>) -> (Rc<Inst>, Env, Vec<Data>, Stack) {
        match Rc::try_unwrap(frame) {
            Ok(mut owned) => (
                Rc::clone(&owned.ret),
                owned.env.clone(),
                mem::take(&mut owned.args),
                owned.parent.take(),
            ),
            Err(shared) => (
                Rc::clone(&shared.ret),
                shared.env.clone(),
                shared.args.clone(),
                shared.parent.clone(),
            ),
        }
    }

    /// The number of frames on a stack.
    pub fn depth(stack: &Stack) -> usize {
        stack.as_ref().map_or(0, |frame| frame.depth)
    }
}

// Deep recursion leaves long chains of frames behind;
// unlink them one at a time rather than recursively.
impl Drop for Frame {
    fn drop(&mut self) {
        let mut parent = self.parent.take();

        while let Some(frame) = parent {
            match Rc::try_unwrap(frame) {
                Ok(mut owned) => parent = owned.parent.take(),
                Err(_) => break,
            }
        }
    }
}
