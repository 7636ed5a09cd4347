use crate::qualtype::QualType;
use crate::usr::USR;

/// Payload of a class, struct or union declaration
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Class {
    /// False for forward declarations that never got a definition
    pub(crate) complete: bool,
    pub(crate) bases: Vec<USR>,
}

impl Class {
    pub fn new(complete: bool, bases: Vec<USR>) -> Self {
        Class { complete, bases }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn bases(&self) -> &[USR] {
        &self.bases
    }
}

/// A data member of a class, surfaced as a property in the target language
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub(crate) qual_type: QualType,
    /// Set when the property cannot be emitted automatically and is expected to be written by hand downstream
    pub(crate) manual_impl: bool,
}

impl Property {
    pub fn new(qual_type: QualType) -> Self {
        Property {
            qual_type,
            manual_impl: false,
        }
    }

    pub fn qual_type(&self) -> &QualType {
        &self.qual_type
    }

    pub fn needs_manual_impl(&self) -> bool {
        self.manual_impl
    }

    pub fn set_manual_impl(&mut self) {
        self.manual_impl = true;
    }
}
