use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::qualtype::QualType;
use crate::usr::USR;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) qual_type: QualType,
    #[serde(default, rename = "default", skip_serializing_if = "Option::is_none")]
    pub(crate) default_value: Option<String>,
}

impl Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.qual_type)?;
        if let Some(default_value) = &self.default_value {
            write!(f, " = {default_value}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl Argument {
    pub fn new(name: &str, qual_type: QualType) -> Self {
        Argument {
            name: name.into(),
            qual_type,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default_value: &str) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qual_type(&self) -> &QualType {
        &self.qual_type
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn set_default_value(&mut self, default_value: Option<String>) {
        self.default_value = default_value;
    }
}

/// Signature of a free function. Methods wrap one of these.
#[derive(Clone, PartialEq, Eq)]
pub struct Function {
    pub(crate) result: QualType,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) is_variadic: bool,
}

impl Function {
    pub fn new(result: QualType, arguments: Vec<Argument>) -> Self {
        Function {
            result,
            arguments,
            is_variadic: false,
        }
    }

    /// Get the return type of the function
    pub fn result(&self) -> &QualType {
        &self.result
    }

    /// Get the function's arguments
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut [Argument] {
        &mut self.arguments
    }

    pub fn is_variadic(&self) -> bool {
        self.is_variadic
    }

    pub fn set_variadic(&mut self, is_variadic: bool) {
        self.is_variadic = is_variadic;
    }

    /// Whether both signatures take the same parameter types in the same order
    pub fn same_parameters(&self, other: &Function) -> bool {
        self.arguments.len() == other.arguments.len()
            && self
                .arguments
                .iter()
                .zip(other.arguments.iter())
                .all(|(a, b)| a.qual_type == b.qual_type)
    }

    /// Parameter type list used to tell overloads apart
    pub fn parameter_key(&self) -> String {
        let args = self
            .arguments
            .iter()
            .map(|a| a.qual_type.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        if self.is_variadic {
            format!("({args}, ...)")
        } else {
            format!("({args})")
        }
    }

    pub fn format(&self, name: &str) -> String {
        let mut args = self
            .arguments
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<String>>();

        if self.is_variadic {
            args.push("...".to_string());
        }

        format!("{name}({}) -> {}", args.join(", "), self.result)
    }
}

pub struct Method {
    pub(crate) function: Function,
    pub(crate) is_virtual: bool,
    pub(crate) is_static: bool,
    /// The instance the method is called on, when the method was made from a free function
    pub(crate) receiver: Option<Argument>,
    pub(crate) promoted_from: Option<USR>,
}

impl Method {
    pub fn new(function: Function) -> Self {
        Method {
            function,
            is_virtual: false,
            is_static: false,
            receiver: None,
            promoted_from: None,
        }
    }

    /// Make an instance method out of a free function by binding its first argument to the receiver
    pub fn from_free_function(function: &Function, usr: USR) -> Option<Self> {
        let (receiver, arguments) = function.arguments.split_first()?;

        Some(Method {
            function: Function {
                result: function.result.clone(),
                arguments: arguments.to_vec(),
                is_variadic: function.is_variadic,
            },
            is_virtual: false,
            is_static: false,
            receiver: Some(receiver.clone()),
            promoted_from: Some(usr),
        })
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn function_mut(&mut self) -> &mut Function {
        &mut self.function
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn set_virtual(&mut self, is_virtual: bool) {
        self.is_virtual = is_virtual;
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    pub fn receiver(&self) -> Option<&Argument> {
        self.receiver.as_ref()
    }

    pub fn promoted_from(&self) -> Option<USR> {
        self.promoted_from
    }
}
