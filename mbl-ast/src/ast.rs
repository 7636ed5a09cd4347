use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use log::*;
use serde::{Deserialize, Serialize};
use ustr::{Ustr, UstrMap};

use crate::class::{Class, Property};
use crate::enm::Enum;
use crate::function::{Function, Method};
use crate::index_map::{IndexMapKey, UstrIndexMap};
use crate::qualtype::{QualType, TypeRef};
use crate::typedef::{Typedef, Variable};
use crate::usr::USR;

use crate::error::Error;
type Result<T, E = Error> = std::result::Result<T, E>;

/// Typedef chains longer than this are assumed to be cyclic
const MAX_TYPEDEF_DEPTH: usize = 32;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    TranslationUnit,
    Namespace,
    Class,
    Function,
    Method,
    Property,
    Enum,
    Typedef,
    Variable,
}

impl Kind {
    /// Free functions, methods, and anything else that can be overloaded
    pub fn is_callable(&self) -> bool {
        matches!(self, Kind::Function | Kind::Method)
    }

    /// Declarations that name a type
    pub fn is_type(&self) -> bool {
        matches!(self, Kind::Class | Kind::Enum | Kind::Typedef)
    }

    /// Whether a declaration of kind `child` may live directly inside one of kind `parent`
    pub fn can_contain(parent: Option<Kind>, child: Kind) -> bool {
        use Kind::*;
        match parent {
            None => child == TranslationUnit,
            Some(TranslationUnit) | Some(Namespace) => {
                matches!(child, Namespace | Class | Function | Enum | Typedef | Variable)
            }
            Some(Class) => matches!(child, Property | Method | Class | Enum | Typedef),
            Some(_) => false,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

pub enum DeclData {
    TranslationUnit,
    Namespace,
    Class(Class),
    Function(Function),
    Method(Method),
    Property(Property),
    Enum(Enum),
    Typedef(Typedef),
    Variable(Variable),
}

pub struct Decl {
    pub(crate) usr: USR,
    pub(crate) name: String,
    pub(crate) original_name: String,
    pub(crate) ignore: bool,
    pub(crate) access: Access,
    pub(crate) parent: Option<DeclId>,
    pub(crate) children: Vec<DeclId>,
    pub(crate) data: DeclData,
}

impl Debug for Decl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ", self.kind())?;

        match &self.data {
            DeclData::TranslationUnit | DeclData::Namespace => write!(f, "{}", self.name)?,
            DeclData::Class(class) => {
                write!(f, "{}", self.name)?;
                if !class.bases.is_empty() {
                    write!(f, " bases={:?}", class.bases)?;
                }
            }
            DeclData::Function(function) => write!(f, "{}", function.format(&self.name))?,
            DeclData::Method(method) => write!(f, "{}", method.function.format(&self.name))?,
            DeclData::Property(property) => write!(f, "{}: {}", self.name, property.qual_type)?,
            DeclData::Variable(variable) => write!(f, "{}: {}", self.name, variable.qual_type)?,
            DeclData::Enum(enm) => {
                let variants = enm
                    .variants
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>();
                write!(f, "{} [{}]", self.name, variants.join(" "))?;
            }
            DeclData::Typedef(typedef) => write!(f, "{} = {}", self.name, typedef.underlying)?,
        }

        if self.original_name != self.name {
            write!(f, " original={}", self.original_name)?;
        }

        if self.access != Access::Public {
            write!(f, " access={:?}", self.access)?;
        }

        match &self.data {
            DeclData::Class(class) if !class.complete => write!(f, " incomplete")?,
            DeclData::Method(method) => {
                if method.is_virtual {
                    write!(f, " virtual")?;
                }
                if method.is_static {
                    write!(f, " static")?;
                }
                if let Some(receiver) = &method.receiver {
                    write!(f, " receiver=({receiver})")?;
                }
            }
            DeclData::Enum(enm) if enm.is_flags => write!(f, " flags")?,
            DeclData::Property(property) if property.manual_impl => write!(f, " manual")?,
            _ => (),
        }

        if self.ignore {
            write!(f, " ignored")?;
        }

        Ok(())
    }
}

impl Decl {
    pub fn new(usr: USR, name: &str, data: DeclData) -> Decl {
        Decl {
            usr,
            name: name.into(),
            original_name: name.into(),
            ignore: false,
            access: Access::Public,
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn translation_unit(file_name: &str) -> Decl {
        Decl::new(
            USR::new(&format!("tu:{file_name}")),
            file_name,
            DeclData::TranslationUnit,
        )
    }

    pub fn namespace(usr: USR, name: &str) -> Decl {
        Decl::new(usr, name, DeclData::Namespace)
    }

    pub fn class(usr: USR, name: &str, class: Class) -> Decl {
        Decl::new(usr, name, DeclData::Class(class))
    }

    pub fn function(usr: USR, name: &str, function: Function) -> Decl {
        Decl::new(usr, name, DeclData::Function(function))
    }

    pub fn method(usr: USR, name: &str, method: Method) -> Decl {
        Decl::new(usr, name, DeclData::Method(method))
    }

    pub fn property(usr: USR, name: &str, qual_type: QualType) -> Decl {
        Decl::new(usr, name, DeclData::Property(Property::new(qual_type)))
    }

    pub fn enumeration(usr: USR, name: &str, variants: Vec<(String, i64)>) -> Decl {
        Decl::new(usr, name, DeclData::Enum(Enum::new(variants)))
    }

    pub fn typedef(usr: USR, name: &str, underlying: QualType) -> Decl {
        Decl::new(usr, name, DeclData::Typedef(Typedef::new(underlying)))
    }

    pub fn variable(usr: USR, name: &str, qual_type: QualType) -> Decl {
        Decl::new(usr, name, DeclData::Variable(Variable::new(qual_type)))
    }

    pub fn with_access(mut self, access: Access) -> Decl {
        self.access = access;
        self
    }

    /// Set the source name when it differs from the name the declaration is created with
    pub fn with_original_name(mut self, original_name: &str) -> Decl {
        self.original_name = original_name.into();
        self
    }

    pub fn usr(&self) -> USR {
        self.usr
    }

    /// The name the declaration will be emitted with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }

    /// The name as spelled in the source header
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    /// Exclude this declaration from emission. There is deliberately no way to undo this.
    pub fn ignore(&mut self) {
        self.ignore = true;
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn set_access(&mut self, access: Access) {
        self.access = access;
    }

    pub fn parent(&self) -> Option<DeclId> {
        self.parent
    }

    pub fn children(&self) -> &[DeclId] {
        &self.children
    }

    pub fn kind(&self) -> Kind {
        match &self.data {
            DeclData::TranslationUnit => Kind::TranslationUnit,
            DeclData::Namespace => Kind::Namespace,
            DeclData::Class(_) => Kind::Class,
            DeclData::Function(_) => Kind::Function,
            DeclData::Method(_) => Kind::Method,
            DeclData::Property(_) => Kind::Property,
            DeclData::Enum(_) => Kind::Enum,
            DeclData::Typedef(_) => Kind::Typedef,
            DeclData::Variable(_) => Kind::Variable,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match &self.data {
            DeclData::Class(class) => Some(class),
            _ => None,
        }
    }

    /// The signature of a function, or of a method
    pub fn as_function(&self) -> Option<&Function> {
        match &self.data {
            DeclData::Function(function) => Some(function),
            DeclData::Method(method) => Some(&method.function),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut Function> {
        match &mut self.data {
            DeclData::Function(function) => Some(function),
            DeclData::Method(method) => Some(&mut method.function),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<&Method> {
        match &self.data {
            DeclData::Method(method) => Some(method),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.data {
            DeclData::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut Property> {
        match &mut self.data {
            DeclData::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Enum> {
        match &self.data {
            DeclData::Enum(enm) => Some(enm),
            _ => None,
        }
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut Enum> {
        match &mut self.data {
            DeclData::Enum(enm) => Some(enm),
            _ => None,
        }
    }

    pub fn as_typedef(&self) -> Option<&Typedef> {
        match &self.data {
            DeclData::Typedef(typedef) => Some(typedef),
            _ => None,
        }
    }

    /// Every type this declaration mentions in its signature or type
    pub fn referenced_usrs(&self) -> Vec<USR> {
        let mut usrs = Vec::new();
        match &self.data {
            DeclData::Function(function) => {
                function.result.referenced_usrs(&mut usrs);
                for arg in &function.arguments {
                    arg.qual_type.referenced_usrs(&mut usrs);
                }
            }
            DeclData::Method(method) => {
                method.function.result.referenced_usrs(&mut usrs);
                for arg in &method.function.arguments {
                    arg.qual_type.referenced_usrs(&mut usrs);
                }
            }
            DeclData::Property(property) => property.qual_type.referenced_usrs(&mut usrs),
            DeclData::Variable(variable) => variable.qual_type.referenced_usrs(&mut usrs),
            DeclData::Typedef(typedef) => typedef.underlying.referenced_usrs(&mut usrs),
            _ => (),
        }
        usrs
    }
}

/// The declaration tree: every declaration from every translation unit in one arena, addressable by [`DeclId`] or
/// by [`USR`]
pub struct AST {
    pub(crate) decls: UstrIndexMap<Decl, DeclId>,
    pub(crate) translation_units: Vec<DeclId>,
    pub(crate) by_original_name: UstrMap<Vec<DeclId>>,
}

impl Debug for AST {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn write_decl(
            ast: &AST,
            id: DeclId,
            depth: usize,
            f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result {
            let indent = format!("{:width$}", "", width = depth * 2);
            writeln!(f, "{indent}{:?}", ast[id])?;
            for child in ast[id].children() {
                write_decl(ast, *child, depth + 1, f)?;
            }
            Ok(())
        }

        for tu in &self.translation_units {
            write_decl(self, *tu, 0, f)?;
        }

        Ok(())
    }
}

impl Default for AST {
    fn default() -> Self {
        AST::new()
    }
}

impl Index<DeclId> for AST {
    type Output = Decl;

    fn index(&self, index: DeclId) -> &Self::Output {
        &self.decls[index]
    }
}

impl IndexMut<DeclId> for AST {
    fn index_mut(&mut self, index: DeclId) -> &mut Self::Output {
        &mut self.decls[index]
    }
}

impl AST {
    pub fn new() -> Self {
        AST {
            decls: UstrIndexMap::new(),
            translation_units: Vec::new(),
            by_original_name: UstrMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Add `decl` to the tree as the last child of `parent`, or as a new translation unit if `parent` is `None`
    pub fn insert(&mut self, parent: Option<DeclId>, decl: Decl) -> Result<DeclId> {
        let parent_kind = parent.map(|p| self[p].kind());
        if !Kind::can_contain(parent_kind, decl.kind()) {
            return Err(Error::InvalidParent {
                parent: parent_kind,
                child: decl.kind(),
                name: decl.name().to_string(),
            });
        }

        if self.decls.contains_key(decl.usr.as_ref()) {
            return Err(Error::DuplicateUsr(decl.usr));
        }

        let mut decl = decl;
        decl.parent = parent;
        let original_name = Ustr::from(decl.original_name());
        let id = self.decls.insert(decl.usr.into(), decl);

        match parent {
            Some(parent) => self[parent].children.push(id),
            None => self.translation_units.push(id),
        }

        self.by_original_name
            .entry(original_name)
            .or_default()
            .push(id);

        Ok(id)
    }

    pub fn translation_units(&self) -> &[DeclId] {
        &self.translation_units
    }

    /// Every declaration id in insertion order
    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        self.decls.ids()
    }

    pub fn get(&self, usr: USR) -> Option<DeclId> {
        self.decls.get_id(usr.as_ref())
    }

    pub fn get_decl(&self, usr: USR) -> Option<&Decl> {
        self.decls.get(usr.as_ref())
    }

    /// All declarations whose source name is `original_name`, in insertion order
    pub fn find_decls(&self, original_name: &str) -> &[DeclId] {
        self.by_original_name
            .get(&Ustr::from(original_name))
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Find the complete definition of the class whose source name is `name`
    pub fn find_complete_class(&self, name: &str) -> Result<DeclId> {
        let matches = self
            .find_decls(name)
            .iter()
            .copied()
            .filter(|id| self[*id].as_class().map(|c| c.is_complete()).unwrap_or(false))
            .collect::<Vec<_>>();

        match matches.len() {
            0 => {
                let mut distances = self
                    .ids()
                    .filter(|id| self[*id].kind() == Kind::Class)
                    .map(|id| {
                        let qname = self.qualified_name(id);
                        (levenshtein::levenshtein(self[id].original_name(), name), qname)
                    })
                    .collect::<Vec<_>>();

                distances.sort_by(|a, b| a.0.cmp(&b.0));

                error!("Could not find a complete class named \"{}\"", name);
                if !distances.is_empty() {
                    error!("Did you mean one of:");
                    for (_, sug) in distances.iter().take(3) {
                        error!("  {sug}");
                    }
                }

                Err(Error::ClassNotFound(name.into()))
            }
            1 => Ok(matches[0]),
            _ => {
                error!("Multiple complete definitions found for class \"{name}\":");
                for id in matches {
                    error!("  {}", self.qualified_name(id));
                }

                Err(Error::MultipleMatches(name.into()))
            }
        }
    }

    /// Direct children of `id` with the given kind
    pub fn children_of_kind(&self, id: DeclId, kind: Kind) -> Vec<DeclId> {
        self[id]
            .children
            .iter()
            .copied()
            .filter(|c| self[*c].kind() == kind)
            .collect()
    }

    /// Every declaration below `id`, depth first, parents before their children
    pub fn descendants(&self, id: DeclId) -> Vec<DeclId> {
        let mut result = Vec::new();
        let mut stack = self[id].children.iter().rev().copied().collect::<Vec<_>>();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self[current].children.iter().rev().copied());
        }
        result
    }

    /// Every declaration in the tree, depth first, in translation unit order
    pub fn walk(&self) -> Vec<DeclId> {
        let mut result = Vec::with_capacity(self.len());
        for tu in &self.translation_units {
            result.push(*tu);
            result.extend(self.descendants(*tu));
        }
        result
    }

    /// Whether `id` and every scope above it are visible, i.e. part of the public API
    pub fn is_publicly_visible(&self, id: DeclId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            let decl = &self[c];
            if decl.ignore || decl.access != Access::Public {
                return false;
            }
            current = decl.parent;
        }
        true
    }

    /// Name qualified with its enclosing namespaces and classes. Translation units are not part of the name.
    pub fn qualified_name(&self, id: DeclId) -> String {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(c) = current {
            let decl = &self[c];
            if decl.kind() != Kind::TranslationUnit {
                names.push(decl.name());
            }
            current = decl.parent;
        }
        names.reverse();
        names.join("::")
    }

    /// Follow `qual_type` through any typedefs it names until reaching a type that is not a typedef
    pub fn resolve_typedef<'a>(&'a self, qual_type: &'a QualType) -> &'a QualType {
        let mut current = qual_type;
        for _ in 0..MAX_TYPEDEF_DEPTH {
            match &current.type_ref {
                TypeRef::Ref(usr) => match self.get_decl(*usr).and_then(|d| d.as_typedef()) {
                    Some(typedef) => current = &typedef.underlying,
                    None => return current,
                },
                _ => return current,
            }
        }

        warn!("Typedef chain from \"{}\" is too deep, treating it as cyclic", qual_type);
        current
    }

    /// The class a value, pointer or reference of this type refers to, looking through typedefs
    pub fn class_for_type(&self, qual_type: &QualType) -> Option<DeclId> {
        let resolved = self.resolve_typedef(qual_type);
        let target = match resolved.pointee() {
            Some(pointee) => self.resolve_typedef(pointee),
            None => resolved,
        };

        match &target.type_ref {
            TypeRef::Ref(usr) => self
                .get(*usr)
                .filter(|id| self[*id].kind() == Kind::Class),
            _ => None,
        }
    }

    /// Whether the type is `void` or a class that was only ever forward declared (or never declared at all)
    pub fn is_opaque(&self, qual_type: &QualType) -> bool {
        let resolved = self.resolve_typedef(qual_type);
        if resolved.is_void() {
            return true;
        }

        match &resolved.type_ref {
            TypeRef::Ref(usr) => match self.get_decl(*usr) {
                Some(decl) => decl.as_class().map(|c| !c.is_complete()).unwrap_or(false),
                None => true,
            },
            _ => false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DeclId(usize);

impl DeclId {
    pub fn new(id: usize) -> DeclId {
        DeclId(id)
    }
}

impl IndexMapKey for DeclId {
    fn get(&self) -> usize {
        self.0
    }

    fn from_index(index: usize) -> Self {
        DeclId(index)
    }
}

impl From<DeclId> for usize {
    fn from(id: DeclId) -> Self {
        id.0
    }
}
