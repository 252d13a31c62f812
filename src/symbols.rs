//! Symbol table: classes and their members.
//!
//! Classes live in a name-keyed map and refer to their parent by name, so an
//! inheritance cycle is representable (and detected later, see
//! `hierarchy`).  Members refer back to their declaring class by name too.
//! Declaration order is kept next to the map so every pass visits classes
//! deterministically.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::ast::Block;
use crate::error::{SemanticError, SemanticErrorKind};
use crate::token::{Token, TokenKind};

pub const OBJECT: &str = "Object";
pub const STRING: &str = "String";
pub const SYSTEM: &str = "System";

/// Classes the language provides; user classes may not reuse these names.
pub const BUILTIN_CLASSES: [&str; 3] = [OBJECT, STRING, SYSTEM];

/// `abstract`, `static` or `final`, on classes and methods alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Abstract,
    Static,
    Final,
}

impl Modifier {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::ABSTRACT => Some(Modifier::Abstract),
            TokenKind::STATIC => Some(Modifier::Static),
            TokenKind::FINAL => Some(Modifier::Final),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalArgument {
    pub name: Token,
    pub ty: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Token,
    pub ty: Token,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Token,
    pub modifier: Option<Modifier>,
    /// `void` or a type token.
    pub return_type: Token,
    /// Declaration order matters for calls and redefinitions.
    pub params: Vec<FormalArgument>,
    pub body: Option<Block>,
    pub owner: String,
}

impl Method {
    pub fn is_static(&self) -> bool {
        self.modifier == Some(Modifier::Static)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifier == Some(Modifier::Abstract)
    }

    pub fn is_final(&self) -> bool {
        self.modifier == Some(Modifier::Final)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub name: Token,
    pub params: Vec<FormalArgument>,
    pub body: Block,
    pub owner: String,
}

#[derive(Debug, Clone)]
pub struct Class {
    pub name: Token,
    pub modifier: Option<Modifier>,
    /// `None` only for `Object`.
    pub parent: Option<Token>,
    /// `None` means the default zero-argument constructor.
    pub constructor: Option<Constructor>,
    pub methods: HashMap<String, Method>,
    /// Own attributes plus, after consolidation, every inherited one.
    pub attributes: HashMap<String, Vec<Attribute>>,
    /// Names of the class itself and of every class above it.
    pub ancestors: HashSet<String>,
    pub consolidated: bool,
    pub builtin: bool,
}

impl Class {
    /// A freshly declared user class extending `parent` (or `Object`).
    pub fn new(name: Token, modifier: Option<Modifier>, parent: Option<Token>) -> Self {
        let parent = parent.unwrap_or_else(|| Token::synthetic(TokenKind::CLASS_IDENTIFIER, OBJECT));
        let mut ancestors = HashSet::new();
        ancestors.insert(name.lexeme.clone());

        Self {
            name,
            modifier,
            parent: Some(parent),
            constructor: None,
            methods: HashMap::new(),
            attributes: HashMap::new(),
            ancestors,
            consolidated: false,
            builtin: false,
        }
    }

    fn builtin(name: &str, methods: Vec<Method>) -> Self {
        let parent = (name != OBJECT).then(|| Token::synthetic(TokenKind::CLASS_IDENTIFIER, OBJECT));
        let ancestors = [name, OBJECT].into_iter().map(str::to_owned).collect();

        Self {
            name: Token::synthetic(TokenKind::CLASS_IDENTIFIER, name),
            modifier: None,
            parent,
            constructor: None,
            methods: methods
                .into_iter()
                .map(|m| (m.name.lexeme.clone(), m))
                .collect(),
            attributes: HashMap::new(),
            ancestors,
            consolidated: true,
            builtin: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name.lexeme
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref().map(|t| t.lexeme.as_str())
    }

    pub fn is_abstract(&self) -> bool {
        self.modifier == Some(Modifier::Abstract)
    }

    /// Parameters of the constructor, empty for the default one.
    pub fn constructor_params(&self) -> &[FormalArgument] {
        self.constructor
            .as_ref()
            .map(|c| c.params.as_slice())
            .unwrap_or(&[])
    }

    /// The attribute `name` as seen from this class: its own declaration if
    /// there is one, otherwise the first inherited one.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        let candidates = self.attributes.get(name)?;

        candidates
            .iter()
            .find(|a| a.owner == self.name.lexeme)
            .or_else(|| candidates.first())
    }

    /// Methods declared by this class itself, in source order.
    pub fn own_methods(&self) -> Vec<&Method> {
        let mut own: Vec<&Method> = self
            .methods
            .values()
            .filter(|m| m.owner == self.name.lexeme)
            .collect();

        own.sort_by_key(|m| (m.name.line, m.name.lexeme.clone()));
        own
    }

    // ───────────────────────────── declaration ────────────────────────────

    pub fn add_attribute(&mut self, attribute: Attribute) -> Result<(), SemanticError> {
        let own = self.name.lexeme.clone();
        let slot = self.attributes.entry(attribute.name.lexeme.clone()).or_default();

        if slot.iter().any(|a| a.owner == own) {
            return Err(SemanticError::new(
                SemanticErrorKind::RepeatedDeclaration,
                &attribute.name,
                format!("attribute '{}' is already declared in class {}", attribute.name.lexeme, own),
            ));
        }

        debug!("Class {}: attribute {}", own, attribute.name.lexeme);

        slot.push(attribute);
        Ok(())
    }

    pub fn add_method(&mut self, method: Method) -> Result<(), SemanticError> {
        if self.methods.contains_key(&method.name.lexeme) {
            return Err(SemanticError::new(
                SemanticErrorKind::RepeatedDeclaration,
                &method.name,
                format!(
                    "method '{}' is already declared in class {}",
                    method.name.lexeme, self.name.lexeme
                ),
            ));
        }

        debug!("Class {}: method {}", self.name.lexeme, method.name.lexeme);

        self.methods.insert(method.name.lexeme.clone(), method);
        Ok(())
    }

    pub fn set_constructor(&mut self, constructor: Constructor) -> Result<(), SemanticError> {
        if self.constructor.is_some() {
            return Err(SemanticError::new(
                SemanticErrorKind::MultipleConstructorDeclarations,
                &constructor.name,
                format!("class {} already declares a constructor", self.name.lexeme),
            ));
        }

        self.constructor = Some(constructor);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-ins
// ─────────────────────────────────────────────────────────────────────────────

fn builtin_method(owner: &str, name: &str, return_type: TokenKind, params: &[(&str, TokenKind)]) -> Method {
    let type_token = |kind: TokenKind| match kind {
        TokenKind::CLASS_IDENTIFIER => Token::synthetic(kind, STRING),
        _ => Token::synthetic(kind, kind.describe()),
    };

    Method {
        name: Token::synthetic(TokenKind::MET_VAR_IDENTIFIER, name),
        modifier: Some(Modifier::Static),
        return_type: type_token(return_type),
        params: params
            .iter()
            .map(|(param, kind)| FormalArgument {
                name: Token::synthetic(TokenKind::MET_VAR_IDENTIFIER, param),
                ty: type_token(*kind),
            })
            .collect(),
        body: None,
        owner: owner.to_owned(),
    }
}

fn object_class() -> Class {
    Class::builtin(
        OBJECT,
        vec![builtin_method(OBJECT, "debugPrint", TokenKind::VOID, &[("i", TokenKind::INT)])],
    )
}

fn string_class() -> Class {
    Class::builtin(STRING, Vec::new())
}

fn system_class() -> Class {
    use TokenKind::{BOOLEAN, CHAR, CLASS_IDENTIFIER, INT, VOID};

    Class::builtin(
        SYSTEM,
        vec![
            builtin_method(SYSTEM, "read", INT, &[]),
            builtin_method(SYSTEM, "printB", VOID, &[("b", BOOLEAN)]),
            builtin_method(SYSTEM, "printC", VOID, &[("c", CHAR)]),
            builtin_method(SYSTEM, "printI", VOID, &[("i", INT)]),
            builtin_method(SYSTEM, "printS", VOID, &[("s", CLASS_IDENTIFIER)]),
            builtin_method(SYSTEM, "println", VOID, &[]),
            builtin_method(SYSTEM, "printBln", VOID, &[("b", BOOLEAN)]),
            builtin_method(SYSTEM, "printCln", VOID, &[("c", CHAR)]),
            builtin_method(SYSTEM, "printIln", VOID, &[("i", INT)]),
            builtin_method(SYSTEM, "printSln", VOID, &[("s", CLASS_IDENTIFIER)]),
        ],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Table
// ─────────────────────────────────────────────────────────────────────────────

/// Global class map of one compilation unit.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    pub(crate) classes: HashMap<String, Class>,
    pub(crate) order: Vec<String>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only `Object`, `String` and `System`.
    pub fn new() -> Self {
        let mut table = Self {
            classes: HashMap::new(),
            order: Vec::new(),
        };

        for class in [object_class(), string_class(), system_class()] {
            table.order.push(class.name.lexeme.clone());
            table.classes.insert(class.name.lexeme.clone(), class);
        }

        info!("Symbol table initialised with built-in classes");
        table
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut Class> {
        self.classes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Every class, built-ins first, then user classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.order.iter().filter_map(|name| self.classes.get(name))
    }

    /// User classes in declaration order.
    pub fn user_classes(&self) -> impl Iterator<Item = &Class> {
        self.classes().filter(|c| !c.builtin)
    }

    pub(crate) fn user_class_names(&self) -> Vec<String> {
        self.user_classes().map(|c| c.name.lexeme.clone()).collect()
    }

    /// Register a new user class.
    pub fn declare_class(&mut self, class: Class) -> Result<(), SemanticError> {
        let name = class.name.lexeme.clone();

        if BUILTIN_CLASSES.contains(&name.as_str()) {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidClassName,
                &class.name,
                format!("{} is a predefined class name", name),
            ));
        }

        if self.classes.contains_key(&name) {
            return Err(SemanticError::new(
                SemanticErrorKind::RepeatedDeclaration,
                &class.name,
                format!("class {} is already declared", name),
            ));
        }

        info!("Declared class {}", name);

        self.order.push(name.clone());
        self.classes.insert(name, class);
        Ok(())
    }

    /// Whether a value of class `sub` can stand where `sup` is expected.
    pub fn conforms(&self, sub: &str, sup: &str) -> bool {
        sub == sup
            || self
                .classes
                .get(sub)
                .is_some_and(|class| class.ancestors.contains(sup))
    }
}
