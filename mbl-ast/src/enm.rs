#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Enum {
    pub(crate) variants: Vec<(String, i64)>,
    /// Whether the members are bit flags meant to be combined
    pub(crate) is_flags: bool,
}

impl Enum {
    pub fn new(variants: Vec<(String, i64)>) -> Self {
        Enum {
            variants,
            is_flags: false,
        }
    }

    pub fn variants(&self) -> &[(String, i64)] {
        &self.variants
    }

    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    pub fn set_flags(&mut self, is_flags: bool) {
        self.is_flags = is_flags;
    }
}
