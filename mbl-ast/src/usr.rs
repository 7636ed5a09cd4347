use std::fmt::{Debug, Display};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ustr::Ustr;

/// Stable identifier the front end assigns to each declaration
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct USR(Ustr);

impl USR {
    pub fn new(s: &str) -> USR {
        USR(Ustr::from(s))
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_str().is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for USR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for USR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<USR> for Ustr {
    fn from(u: USR) -> Self {
        u.0
    }
}

impl AsRef<Ustr> for USR {
    fn as_ref(&self) -> &Ustr {
        &self.0
    }
}

impl Serialize for USR {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for USR {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(USR::new(&s))
    }
}
