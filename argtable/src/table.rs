use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::arg::Arg;
use crate::end::End;

/// Typed handle to a slot inside an [`ArgTable`].
pub struct Key<T> {
    index: usize,
    _slot: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    /// Position of the slot in its table.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key<{}>({})", type_name::<T>(), self.index)
    }
}

/// An ordered table of slots terminated by an end-marker.
///
/// The table owns every slot; dropping it releases them all at once.
pub struct ArgTable {
    pub(crate) progname: String,
    pub(crate) slots: Vec<Box<dyn Arg>>,
    pub(crate) end: End,
}

impl ArgTable {
    /// An empty table whose end-marker keeps up to `maxerrors` errors.
    pub fn new(maxerrors: usize) -> crate::Result<Self> {
        Ok(ArgTable {
            progname: String::new(),
            slots: Vec::new(),
            end: End::new(maxerrors)?,
        })
    }

    /// Append `slot` and return a key for reading it back after a parse.
    pub fn add<T: Arg>(&mut self, slot: T) -> Key<T> {
        let index = self.slots.len();
        self.slots.push(Box::new(slot));
        Key {
            index,
            _slot: PhantomData,
        }
    }

    pub fn get<T: Arg>(&self, key: Key<T>) -> Option<&T> {
        self.slots.get(key.index)?.as_any().downcast_ref()
    }

    pub fn get_mut<T: Arg>(&mut self, key: Key<T>) -> Option<&mut T> {
        self.slots.get_mut(key.index)?.as_any_mut().downcast_mut()
    }

    /// Program name taken from `argv[0]` by the last parse.
    pub fn progname(&self) -> &str {
        &self.progname
    }

    pub fn end(&self) -> &End {
        &self.end
    }

    pub fn slot(&self, index: usize) -> Option<&dyn Arg> {
        self.slots.get(index).map(|s| s.as_ref())
    }

    pub fn slots(&self) -> impl Iterator<Item = &dyn Arg> {
        self.slots.iter().map(|s| s.as_ref())
    }

    /// Number of slots, not counting the end-marker.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Errors seen by the last parse, including any the end-marker dropped.
    pub fn nerrors(&self) -> usize {
        self.end.records().len() + self.end.dropped()
    }
}

impl fmt::Debug for ArgTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgTable")
            .field("progname", &self.progname)
            .field("slots", &self.slots.len())
            .field("end", &self.end)
            .finish()
    }
}

impl<T: Arg> Index<Key<T>> for ArgTable {
    type Output = T;

    fn index(&self, key: Key<T>) -> &T {
        match self.get(key) {
            Some(slot) => slot,
            None => panic!("{:?} does not belong to this table", key),
        }
    }
}

impl<T: Arg> IndexMut<Key<T>> for ArgTable {
    fn index_mut(&mut self, key: Key<T>) -> &mut T {
        match self.get_mut(key) {
            Some(slot) => slot,
            None => panic!("{:?} does not belong to this table", key),
        }
    }
}
