//! Environment frames for variable scoping in the interpreter.
//!
//! A [`Frame`] is one lexical scope: its bindings plus a link to the
//! enclosing frame. Frames are shared through [`FrameRef`] because a closure
//! can keep its defining frame alive after the block that created it exits.
//!
//! # Lookup paths
//!
//! - **Dynamic**: [`FrameRef::get`] / [`FrameRef::assign`] walk parent links by
//!   name. Used for globals, which the resolver leaves unresolved.
//! - **Addressed**: [`FrameRef::get_at`] / [`FrameRef::assign_at`] jump exactly
//!   `distance` links and touch only that frame. A miss there is a resolver
//!   defect and is never retried dynamically.
//!
//! # Reclamation
//!
//! A function value stored in the frame its closure references forms an `Rc`
//! cycle. [`Environment`] remembers every captured frame weakly and severs
//! them all when it is dropped, so frames are freed en masse at interpreter
//! teardown.

use rustc_hash::FxHashMap;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use lox_ir::Name;

use crate::Value;

/// Error returned by assignment when no frame binds the name.
///
/// Assignment never creates a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    Undefined,
}

/// A single lexical scope.
#[derive(Default)]
pub struct Frame {
    bindings: FxHashMap<Name, Value>,
    parent: Option<FrameRef>,
}

impl Frame {
    /// Create a frame with no parent (the globals).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: FrameRef) -> Self {
        Frame {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Insert or overwrite a binding in this frame. Never fails.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Read a binding of this frame only.
    #[inline]
    pub fn get_local(&self, name: Name) -> Option<Value> {
        self.bindings.get(&name).cloned()
    }

    /// Overwrite an existing binding of this frame only.
    #[inline]
    pub fn assign_local(&mut self, name: Name, value: Value) -> Result<(), AssignError> {
        match self.bindings.get_mut(&name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(AssignError::Undefined),
        }
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    pub fn parent(&self) -> Option<&FrameRef> {
        self.parent.as_ref()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("bindings", &self.bindings.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Shared, single-threaded handle to a [`Frame`].
///
/// All frame allocations go through [`FrameRef::new`]. Cloning shares the
/// frame; it never copies bindings.
#[repr(transparent)]
pub struct FrameRef(Rc<RefCell<Frame>>);

impl FrameRef {
    #[inline]
    pub fn new(frame: Frame) -> Self {
        FrameRef(Rc::new(RefCell::new(frame)))
    }

    /// Create an empty child of this frame.
    #[inline]
    pub fn child(&self) -> Self {
        FrameRef::new(Frame::with_parent(self.clone()))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, Frame> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Frame> {
        self.0.borrow_mut()
    }

    pub fn downgrade(&self) -> WeakFrameRef {
        WeakFrameRef(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &FrameRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn parent(&self) -> Option<FrameRef> {
        self.borrow().parent.clone()
    }

    /// The frame exactly `distance` parent links up.
    pub fn ancestor(&self, distance: usize) -> Option<FrameRef> {
        let mut frame = self.clone();
        for _ in 0..distance {
            let parent = frame.parent()?;
            frame = parent;
        }
        Some(frame)
    }

    /// Look a name up, walking parent links until found.
    pub fn get(&self, name: Name) -> Option<Value> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let current = frame.borrow();
                if let Some(value) = current.bindings.get(&name) {
                    return Some(value.clone());
                }
                current.parent.clone()
            };
            frame = parent?;
        }
    }

    /// Overwrite the nearest binding of `name`, walking parent links.
    pub fn assign(&self, name: Name, value: Value) -> Result<(), AssignError> {
        let mut frame = self.clone();
        loop {
            let parent = {
                let mut current = frame.borrow_mut();
                if let Some(slot) = current.bindings.get_mut(&name) {
                    *slot = value;
                    return Ok(());
                }
                current.parent.clone()
            };
            frame = parent.ok_or(AssignError::Undefined)?;
        }
    }

    /// Read `name` from exactly the frame `distance` links up.
    pub fn get_at(&self, distance: usize, name: Name) -> Option<Value> {
        self.ancestor(distance)?.borrow().get_local(name)
    }

    /// Overwrite `name` in exactly the frame `distance` links up.
    pub fn assign_at(&self, distance: usize, name: Name, value: Value) -> Result<(), AssignError> {
        self.ancestor(distance)
            .ok_or(AssignError::Undefined)?
            .borrow_mut()
            .assign_local(name, value)
    }

    /// Drop all bindings and the parent link, breaking any cycle through
    /// this frame. The contents are released after the borrow ends so that
    /// destructors may touch other frames.
    fn sever(&self) {
        let contents = std::mem::take(&mut *self.borrow_mut());
        drop(contents);
    }
}

impl Clone for FrameRef {
    #[inline]
    fn clone(&self) -> Self {
        FrameRef(Rc::clone(&self.0))
    }
}

impl fmt::Debug for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(frame) => f.debug_tuple("FrameRef").field(&*frame).finish(),
            Err(_) => f.write_str("FrameRef(<borrowed>)"),
        }
    }
}

/// Non-owning handle to a frame.
#[derive(Clone)]
pub struct WeakFrameRef(Weak<RefCell<Frame>>);

impl WeakFrameRef {
    pub fn upgrade(&self) -> Option<FrameRef> {
        self.0.upgrade().map(FrameRef)
    }

    pub fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }

    fn points_to(&self, frame: &FrameRef) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&frame.0))
    }
}

/// Captured-frame count at which dead entries are first pruned.
const MIN_PRUNE_THRESHOLD: usize = 64;

/// The interpreter's frame graph.
///
/// Holds the globals frame (alive for the interpreter's lifetime), the
/// currently active frame, and weak handles to every frame a closure has
/// captured.
pub struct Environment {
    globals: FrameRef,
    current: FrameRef,
    captured: Vec<WeakFrameRef>,
    prune_at: usize,
}

impl Environment {
    pub fn new() -> Self {
        let globals = FrameRef::new(Frame::new());
        Environment {
            current: globals.clone(),
            globals,
            captured: Vec::new(),
            prune_at: MIN_PRUNE_THRESHOLD,
        }
    }

    pub fn globals(&self) -> &FrameRef {
        &self.globals
    }

    pub fn current(&self) -> &FrameRef {
        &self.current
    }

    pub fn is_at_globals(&self) -> bool {
        self.current.ptr_eq(&self.globals)
    }

    /// Define in the current frame.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) {
        self.current.borrow_mut().define(name, value);
    }

    /// Define in the globals frame regardless of the current frame.
    pub fn define_global(&mut self, name: Name, value: Value) {
        self.globals.borrow_mut().define(name, value);
    }

    /// Dynamic lookup for unresolved references.
    #[inline]
    pub fn get_global(&self, name: Name) -> Option<Value> {
        self.globals.get(name)
    }

    /// Dynamic assignment for unresolved targets.
    #[inline]
    pub fn assign_global(&self, name: Name, value: Value) -> Result<(), AssignError> {
        self.globals.assign(name, value)
    }

    /// Addressed lookup relative to the current frame.
    #[inline]
    pub fn get_at(&self, distance: usize, name: Name) -> Option<Value> {
        self.current.get_at(distance, name)
    }

    /// Addressed assignment relative to the current frame.
    #[inline]
    pub fn assign_at(&self, distance: usize, name: Name, value: Value) -> Result<(), AssignError> {
        self.current.assign_at(distance, name, value)
    }

    /// Make a fresh child of the current frame active.
    ///
    /// Returns the previously active frame for [`Environment::restore`].
    #[inline]
    pub fn push_frame(&mut self) -> FrameRef {
        let child = self.current.child();
        std::mem::replace(&mut self.current, child)
    }

    /// Make `frame` active, returning the previously active frame.
    #[inline]
    pub fn enter(&mut self, frame: FrameRef) -> FrameRef {
        std::mem::replace(&mut self.current, frame)
    }

    #[inline]
    pub fn restore(&mut self, previous: FrameRef) {
        self.current = previous;
    }

    /// Hand out the current frame as a closure environment.
    pub fn capture(&mut self) -> FrameRef {
        let frame = self.current.clone();
        self.track(&frame);
        frame
    }

    /// Remember `frame` for teardown. Globals are always severed, so they
    /// are not tracked.
    pub fn track(&mut self, frame: &FrameRef) {
        if frame.ptr_eq(&self.globals) {
            return;
        }
        if self.captured.last().is_some_and(|last| last.points_to(frame)) {
            return;
        }
        self.captured.push(frame.downgrade());
        if self.captured.len() >= self.prune_at {
            self.captured.retain(WeakFrameRef::is_live);
            self.prune_at = (self.captured.len() * 2).max(MIN_PRUNE_THRESHOLD);
            tracing::trace!(live = self.captured.len(), "pruned captured frames");
        }
    }

    /// Number of captured frames still tracked (live or not yet pruned).
    pub fn tracked_frames(&self) -> usize {
        self.captured.len()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        let live: Vec<FrameRef> = self
            .captured
            .drain(..)
            .filter_map(|weak| weak.upgrade())
            .collect();
        tracing::trace!(frames = live.len(), "severing captured frames");
        for frame in &live {
            frame.sever();
        }
        self.current.sever();
        self.globals.sever();
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("globals", &self.globals)
            .field("at_globals", &self.is_at_globals())
            .field("tracked_frames", &self.captured.len())
            .finish()
    }
}
