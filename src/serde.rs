//! # Serde module for Sketch
//!
//! `Sketch` is serialized as a tuple `(precision, words)` where `words` is the packed register
//! buffer. Deserialization checks that `precision` is in range and that `words` has exactly the
//! length the precision requires. Bits past the last register are ignored.
//!
//! The encoding follows the in-memory register layout and carries no version tag; it is meant
//! for moving a sketch between processes built from the same crate version.
use std::hash::BuildHasher;

use serde::de::Error;
use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize};

use crate::sketch::Sketch;

impl<S: BuildHasher> Serialize for Sketch<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.precision())?;
        tup.serialize_element(self.words())?;
        tup.end()
    }
}

impl<'de, S: BuildHasher + Default> Deserialize<'de> for Sketch<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (precision, words): (u32, Vec<u32>) = Deserialize::deserialize(deserializer)?;
        Sketch::from_parts(precision, words, S::default()).map_err(D::Error::custom)
    }
}
