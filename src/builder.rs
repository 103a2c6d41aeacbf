//! Construction context that assembles parser actions into a [`Value`] tree.
//!
//! The parser owns one [`Builder`] per decode call. It holds a value stack
//! (open containers and finished values waiting to be attached) and a stack of
//! keys waiting for their value. Every operation checks that the stacks are in
//! the shape the grammar guarantees; a violation is reported as
//! [`Error::Internal`] because it means the parser is wrong, not the input.

use crate::{Compound, Error, Result, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    Compound,
    List,
}

#[derive(Debug, Default)]
pub(crate) struct Builder {
    stack: Vec<Value>,
    keys: Vec<String>,
    /// Stack index and kind of every container that has not been ended yet.
    open: Vec<(usize, Container)>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Kind of the innermost open container, if any.
    pub fn innermost(&self) -> Option<Container> {
        self.open.last().map(|&(_, kind)| kind)
    }

    fn begin(&mut self, value: Value, kind: Container) {
        self.open.push((self.stack.len(), kind));
        self.stack.push(value);
    }

    pub fn begin_compound(&mut self) {
        self.begin(Value::Compound(Compound::new()), Container::Compound);
    }

    pub fn begin_list(&mut self) {
        self.begin(Value::List(Vec::new()), Container::List);
    }

    pub fn push_scalar(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn set_pending_key(&mut self, key: String) {
        self.keys.push(key);
    }

    /// Pops a finished value sitting directly above the innermost open
    /// container of the given kind, and returns it with that container.
    fn take_item(&mut self, kind: Container) -> Result<(Value, &mut Value)> {
        let &(index, open_kind) = self
            .open
            .last()
            .ok_or_else(|| Error::internal("commit without an open container"))?;
        if open_kind != kind {
            return Err(Error::internal(format!(
                "commit into {:?} while {:?} is open",
                kind, open_kind
            )));
        }
        if self.stack.len() != index + 2 {
            return Err(Error::internal(format!(
                "expected exactly one pending value above the open {:?}, found {}",
                kind,
                self.stack.len().saturating_sub(index + 1)
            )));
        }
        let value = self
            .stack
            .pop()
            .ok_or_else(|| Error::internal("value stack underflow"))?;
        let container = self
            .stack
            .last_mut()
            .ok_or_else(|| Error::internal("value stack underflow"))?;
        Ok((value, container))
    }

    /// Pops the pending value and key and stores them in the open compound.
    pub fn commit_pair(&mut self) -> Result<()> {
        let key = self
            .keys
            .pop()
            .ok_or_else(|| Error::internal("commit_pair without a pending key"))?;
        let (value, container) = self.take_item(Container::Compound)?;
        match container {
            Value::Compound(map) => {
                map.insert(key, value);
                Ok(())
            }
            other => Err(Error::internal(format!(
                "open compound slot holds a {}",
                other.type_name()
            ))),
        }
    }

    /// Pops the pending value and appends it to the open list.
    pub fn commit_list_item(&mut self) -> Result<()> {
        let (value, container) = self.take_item(Container::List)?;
        match container {
            Value::List(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(Error::internal(format!(
                "open list slot holds a {}",
                other.type_name()
            ))),
        }
    }

    fn end(&mut self, kind: Container) -> Result<()> {
        match self.open.pop() {
            Some((index, open_kind)) if open_kind == kind && index + 1 == self.stack.len() => {
                Ok(())
            }
            Some((_, open_kind)) => Err(Error::internal(format!(
                "cannot end {:?}: innermost open container is {:?} with pending values",
                kind, open_kind
            ))),
            None => Err(Error::internal(format!("end of {:?} with nothing open", kind))),
        }
    }

    /// Closes the innermost compound, leaving it on the stack as a finished value.
    pub fn end_compound(&mut self) -> Result<()> {
        self.end(Container::Compound)
    }

    /// Closes the innermost list, leaving it on the stack as a finished value.
    pub fn end_list(&mut self) -> Result<()> {
        self.end(Container::List)
    }

    /// Returns the single finished root value.
    pub fn finish(mut self) -> Result<Value> {
        if !self.open.is_empty() || !self.keys.is_empty() {
            return Err(Error::internal(format!(
                "{} container(s) and {} key(s) still pending at end of input",
                self.open.len(),
                self.keys.len()
            )));
        }
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(value), true) => Ok(value),
            (None, _) => Err(Error::internal("no value was built")),
            (Some(_), false) => Err(Error::internal(format!(
                "{} values left on the stack",
                self.stack.len() + 1
            ))),
        }
    }
}
