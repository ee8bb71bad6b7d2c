//! Object paths identifying tree nodes.

use core::fmt::{self, Write};

use heapless::String;

use crate::error::Error;

/// Longest path the crate builds.
pub const MAX_PATH_LEN: usize = 64;

/// Stable, addressable identity of an exported object, e.g.
/// `/glove/hid/service0/char5/desc1`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectPath(String<MAX_PATH_LEN>);

impl ObjectPath {
    /// Validate and copy `path`.
    ///
    /// Elements are separated by `/`, contain only `[A-Za-z0-9_]`, and are
    /// never empty. `/` alone is the root path.
    pub fn new(path: &str) -> Result<Self, Error> {
        if !is_valid(path) {
            return Err(Error::InvalidArgument);
        }
        let mut s = String::new();
        s.push_str(path).map_err(|_| Error::BufferOverflow)?;
        Ok(Self(s))
    }

    /// Append `/{prefix}{index}`.
    pub fn child(&self, prefix: &str, index: usize) -> Result<Self, Error> {
        let mut s = String::new();
        let base = if self.is_root() { "" } else { self.as_str() };
        write!(s, "{}/{}{}", base, prefix, index).map_err(|_| Error::BufferOverflow)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_root(&self) -> bool {
        self.0.as_str() == "/"
    }

    /// Path with the last element removed, or `None` for the root.
    pub fn parent(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(0) => Some("/"),
            Some(i) => Some(&self.0[..i]),
            None => None,
        }
    }

    /// `true` when `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &ObjectPath) -> bool {
        if ancestor.is_root() {
            return !self.is_root();
        }
        self.as_str()
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

fn is_valid(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    rest.split('/').all(|element| {
        !element.is_empty()
            && element
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    })
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for ObjectPath {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ObjectPath {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
