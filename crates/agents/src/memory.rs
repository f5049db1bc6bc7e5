//! Fixed-capacity memory of recent values.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Round-robin memory: keeps the latest `capacity` values, oldest evicted first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawRoundRobin<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct RoundRobin<T> {
    values: VecDeque<T>,
    capacity: usize,
}

/// Unchecked serde shape of [`RoundRobin`].
#[derive(Deserialize)]
struct RawRoundRobin<T> {
    values: VecDeque<T>,
    capacity: usize,
}

impl<T> TryFrom<RawRoundRobin<T>> for RoundRobin<T> {
    type Error = String;

    fn try_from(raw: RawRoundRobin<T>) -> Result<Self, Self::Error> {
        if raw.capacity == 0 {
            return Err("round-robin capacity must be at least 1".into());
        }
        if raw.values.len() > raw.capacity {
            return Err(format!(
                "round-robin holds {} values but capacity is {}",
                raw.values.len(),
                raw.capacity
            ));
        }
        Ok(Self {
            values: raw.values,
            capacity: raw.capacity,
        })
    }
}

impl<T: Clone> RoundRobin<T> {
    /// Memory of `capacity` slots, all holding `initial`.
    ///
    /// Capacity is at least one.
    pub fn filled(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: std::iter::repeat_n(initial, capacity).collect(),
            capacity,
        }
    }
}

impl<T> RoundRobin<T> {
    /// Push a new value, evicting the oldest when full.
    pub fn record(&mut self, value: T) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Most recent value.
    pub fn latest(&self) -> Option<&T> {
        self.values.back()
    }

    /// Value recorded `age` steps ago (0 = latest).
    pub fn get(&self, age: usize) -> Option<&T> {
        let len = self.values.len();
        if age >= len {
            return None;
        }
        self.values.get(len - 1 - age)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}
