use crate::qualtype::QualType;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typedef {
    pub(crate) underlying: QualType,
}

impl Typedef {
    pub fn new(underlying: QualType) -> Self {
        Typedef { underlying }
    }

    pub fn underlying(&self) -> &QualType {
        &self.underlying
    }
}

/// A global variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub(crate) qual_type: QualType,
}

impl Variable {
    pub fn new(qual_type: QualType) -> Self {
        Variable { qual_type }
    }

    pub fn qual_type(&self) -> &QualType {
        &self.qual_type
    }
}
