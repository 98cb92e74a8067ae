//! Vector storage for field values
//!
//! A field owns exactly one vector. Frames only talk to the [`Vector`]
//! trait, so the backing storage can be swapped by passing a different
//! [`VectorFactory`] when the frame is built.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Trait for all value storage
pub trait Vector: fmt::Debug + Send + Sync {
    /// Number of logical values
    fn len(&self) -> usize;

    /// Value at a logical index
    fn get(&self, index: usize) -> Option<&Value>;

    /// Replace the value at `index`; an index at or past the end appends
    fn set(&mut self, index: usize, value: Value);

    /// Append one value
    fn add(&mut self, value: Value);

    /// Reverse the logical order in place
    fn reverse(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the values out in logical order
    fn to_vec(&self) -> Vec<Value> {
        (0..self.len())
            .filter_map(|i| self.get(i).cloned())
            .collect()
    }
}

/// Type-erased vector for dynamic dispatch
pub type BoxedVector = Box<dyn Vector>;

/// Builds the backing vector for a new field from its initial values
pub type VectorFactory = Arc<dyn Fn(Vec<Value>) -> BoxedVector + Send + Sync>;

impl<'v> dyn Vector + 'v {
    /// Iterate values in logical order
    pub fn iter(&self) -> VectorIter<'_> {
        VectorIter {
            vector: self,
            position: 0,
        }
    }
}

pub struct VectorIter<'a> {
    vector: &'a dyn Vector,
    position: usize,
}

impl<'a> Iterator for VectorIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.vector.get(self.position)?;
        self.position += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

/// Unbounded, array-backed storage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayVector {
    buffer: Vec<Value>,
}

impl ArrayVector {
    pub fn new(buffer: Vec<Value>) -> Self {
        Self { buffer }
    }

    pub fn buffer(&self) -> &[Value] {
        &self.buffer
    }

    /// Factory producing plain array vectors
    pub fn factory() -> VectorFactory {
        Arc::new(|buffer| Box::new(ArrayVector::new(buffer)))
    }
}

impl From<Vec<Value>> for ArrayVector {
    fn from(buffer: Vec<Value>) -> Self {
        Self::new(buffer)
    }
}

impl Vector for ArrayVector {
    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.buffer.get(index)
    }

    fn set(&mut self, index: usize, value: Value) {
        if index < self.buffer.len() {
            self.buffer[index] = value;
        } else {
            self.buffer.resize(index, Value::Null);
            self.buffer.push(value);
        }
    }

    fn add(&mut self, value: Value) {
        self.buffer.push(value);
    }

    fn reverse(&mut self) {
        self.buffer.reverse();
    }

    fn to_vec(&self) -> Vec<Value> {
        self.buffer.clone()
    }
}

/// Which end of a circular vector receives new values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppendMode {
    /// New values go first; the last value is dropped when full
    Head,
    /// New values go last; the first value is dropped when full
    #[default]
    Tail,
}

/// Default number of values a circular vector keeps
pub const DEFAULT_CIRCULAR_CAPACITY: usize = 1000;

fn default_capacity() -> usize {
    DEFAULT_CIRCULAR_CAPACITY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularOptions {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub append: AppendMode,
}

impl CircularOptions {
    pub fn new(capacity: usize, append: AppendMode) -> Self {
        Self { capacity, append }
    }
}

impl Default for CircularOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CIRCULAR_CAPACITY,
            append: AppendMode::Tail,
        }
    }
}

/// Fixed-capacity storage that evicts the oldest value once full.
///
/// Indexes are logical: index 0 is always the first value in the
/// current order, regardless of where it sits in the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct CircularVector {
    buffer: VecDeque<Value>,
    capacity: usize,
    append: AppendMode,
}

impl CircularVector {
    pub fn new(options: CircularOptions) -> Self {
        Self {
            buffer: VecDeque::with_capacity(options.capacity),
            capacity: options.capacity,
            append: options.append,
        }
    }

    /// Seed with initial values, keeping the `capacity` values nearest
    /// the append end
    pub fn with_values(options: CircularOptions, values: Vec<Value>) -> Self {
        let mut vector = Self::new(options);
        let excess = values.len().saturating_sub(options.capacity);
        match options.append {
            AppendMode::Tail => vector.buffer.extend(values.into_iter().skip(excess)),
            AppendMode::Head => vector
                .buffer
                .extend(values.into_iter().take(options.capacity)),
        }
        vector
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn append_mode(&self) -> AppendMode {
        self.append
    }

    /// Factory producing circular vectors with the given options
    pub fn factory(options: CircularOptions) -> VectorFactory {
        Arc::new(move |buffer| Box::new(CircularVector::with_values(options, buffer)))
    }
}

impl Vector for CircularVector {
    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn get(&self, index: usize) -> Option<&Value> {
        self.buffer.get(index)
    }

    fn set(&mut self, index: usize, value: Value) {
        if index < self.buffer.len() {
            self.buffer[index] = value;
        } else {
            self.add(value);
        }
    }

    fn add(&mut self, value: Value) {
        if self.capacity == 0 {
            return;
        }
        match self.append {
            AppendMode::Tail => {
                if self.buffer.len() >= self.capacity {
                    self.buffer.pop_front();
                }
                self.buffer.push_back(value);
            }
            AppendMode::Head => {
                if self.buffer.len() >= self.capacity {
                    self.buffer.pop_back();
                }
                self.buffer.push_front(value);
            }
        }
    }

    fn reverse(&mut self) {
        self.buffer.make_contiguous().reverse();
    }
}
