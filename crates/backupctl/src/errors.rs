//! Collecting several independent failures into one error value.

use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

/// Ordered list of errors that drops any error whose message was already
/// recorded.
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Vec<Error>,
    seen: HashSet<String>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `err`. Returns `false` if an error with the same message was
    /// already present.
    pub fn push(&mut self, err: Error) -> bool {
        if !self.seen.insert(err.to_string()) {
            return false;
        }
        self.errors.push(err);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` when nothing was recorded, otherwise `Error::Aggregate`.
    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Aggregate(self))
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => Ok(()),
            [only] => write!(f, "{}", only),
            many => {
                write!(f, "[")?;
                for (i, err) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                write!(f, "]")
            }
        }
    }
}
