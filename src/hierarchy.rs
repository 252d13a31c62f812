/*!
Class hierarchy passes over a filled [`SymbolTable`].

1. [`SymbolTable::check_declarations`] validates every user class against
   the whole table: parent exists and may be extended, inheritance is
   acyclic, and every type named by a member resolves.  It also fills each
   class's ancestor set.
2. [`SymbolTable::consolidate`] linearises inheritance parent-first: it
   merges attributes, validates redefinitions and copies inherited methods
   down, so afterwards every class's maps are complete.

Both passes are iterative; no recursion follows the `extends` chain.

| Pass                 | Cost          |
|----------------------|---------------|
| `check_declarations` | Θ(C + M)      |
| `consolidate`        | Θ(C · (A + M))|

with C classes, M members and A attributes per class.  Each class is walked
once thanks to the acyclic memo and the `consolidated` flag.
*/

use std::collections::HashSet;

use log::{debug, info};

use crate::error::{SemanticError, SemanticErrorKind};
use crate::symbols::{Class, FormalArgument, Method, Modifier, SymbolTable, OBJECT};
use crate::token::{Token, TokenKind};

type Result<T> = std::result::Result<T, SemanticError>;

impl SymbolTable {
    /// Validate every user class against the complete table.
    pub fn check_declarations(&mut self) -> Result<()> {
        info!("Checking declarations");

        let mut acyclic: HashSet<String> = self
            .classes()
            .filter(|c| c.builtin)
            .map(|c| c.name.lexeme.clone())
            .collect();

        for name in self.user_class_names() {
            self.check_parent(&name)?;
            self.detect_cycle(&name, &mut acyclic)?;
            self.check_member_types(&name)?;
        }

        Ok(())
    }

    fn check_parent(&self, name: &str) -> Result<()> {
        let Some(class) = self.class(name) else {
            return Ok(());
        };

        let Some(parent_token) = &class.parent else {
            return Ok(());
        };

        let Some(parent) = self.class(&parent_token.lexeme) else {
            return Err(SemanticError::new(
                SemanticErrorKind::UndeclaredClass,
                parent_token,
                format!("parent class {} is not declared", parent_token.lexeme),
            ));
        };

        if matches!(parent.modifier, Some(Modifier::Static | Modifier::Final)) {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidInheritance,
                parent_token,
                format!("class {} cannot extend static or final class {}", name, parent_token.lexeme),
            ));
        }

        Ok(())
    }

    /// Walk up from `start` until a class known to be acyclic is reached.
    ///
    /// Every class on the walked path is promoted to `acyclic` and receives
    /// its full ancestor set.  Meeting a class twice on the same path is a
    /// cycle.
    fn detect_cycle(&mut self, start: &str, acyclic: &mut HashSet<String>) -> Result<()> {
        let mut on_path: HashSet<String> = HashSet::new();
        let mut path: Vec<String> = Vec::new();
        let mut current = start.to_owned();

        let mut inherited = loop {
            let Some(class) = self.class(&current) else {
                unreachable!("parents are checked before cycles");
            };

            if acyclic.contains(&current) {
                break class.ancestors.clone();
            }

            if !on_path.insert(current.clone()) {
                return Err(SemanticError::new(
                    SemanticErrorKind::CircularInheritance,
                    &class.name,
                    format!("circular inheritance through class {}", current),
                ));
            }

            let Some(parent) = &class.parent else {
                break HashSet::new();
            };

            if !self.contains(&parent.lexeme) {
                return Err(SemanticError::new(
                    SemanticErrorKind::UndeclaredClass,
                    parent,
                    format!("parent class {} is not declared", parent.lexeme),
                ));
            }

            path.push(current.clone());
            current = parent.lexeme.clone();
        };

        for name in path.into_iter().rev() {
            inherited.insert(name.clone());

            if let Some(class) = self.class_mut(&name) {
                class.ancestors.extend(inherited.iter().cloned());
            }

            debug!("Class {} is acyclic", name);

            acyclic.insert(name);
        }

        Ok(())
    }

    fn resolve_type(&self, ty: &Token) -> Result<()> {
        if ty.kind == TokenKind::CLASS_IDENTIFIER && !self.contains(&ty.lexeme) {
            return Err(SemanticError::new(
                SemanticErrorKind::UndeclaredClass,
                ty,
                format!("type {} is not declared", ty.lexeme),
            ));
        }

        Ok(())
    }

    fn resolve_params(&self, params: &[FormalArgument]) -> Result<()> {
        params.iter().try_for_each(|p| self.resolve_type(&p.ty))
    }

    fn check_member_types(&self, name: &str) -> Result<()> {
        let Some(class) = self.class(name) else {
            return Ok(());
        };

        if let Some(constructor) = &class.constructor {
            self.resolve_params(&constructor.params)?;
        }

        let mut attributes: Vec<_> = class.attributes.values().flatten().collect();
        attributes.sort_by_key(|a| a.name.line);

        for attribute in attributes {
            self.resolve_type(&attribute.ty)?;
        }

        for method in class.own_methods() {
            self.resolve_type(&method.return_type)?;
            self.resolve_params(&method.params)?;
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Consolidation
    // ─────────────────────────────────────────────────────────────────────────

    /// Flatten inheritance into every user class, parents first.
    pub fn consolidate(&mut self) -> Result<()> {
        info!("Consolidating class hierarchy");

        for name in self.user_class_names() {
            let mut chain: Vec<String> = Vec::new();
            let mut current = name;

            loop {
                let Some(class) = self.class(&current) else {
                    unreachable!("parents are checked before consolidation");
                };

                if class.consolidated {
                    break;
                }

                if chain.contains(&current) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::CircularInheritance,
                        &class.name,
                        format!("circular inheritance through class {}", current),
                    ));
                }

                let parent = class.parent_name().unwrap_or(OBJECT).to_owned();

                chain.push(current);
                current = parent;
            }

            for name in chain.into_iter().rev() {
                self.consolidate_class(&name)?;
            }
        }

        Ok(())
    }

    fn consolidate_class(&mut self, name: &str) -> Result<()> {
        let Some(mut class) = self.classes.remove(name) else {
            return Ok(());
        };

        let result = match class.parent_name().and_then(|p| self.classes.get(p)) {
            Some(parent) => merge_parent(&mut class, parent),
            None => Err(SemanticError::new(
                SemanticErrorKind::UndeclaredClass,
                &class.name,
                format!("parent class of {} is not declared", name),
            )),
        };

        self.classes.insert(name.to_owned(), class);

        result
    }
}

fn redefinition(token: &Token, msg: impl Into<String>) -> SemanticError {
    SemanticError::new(SemanticErrorKind::InvalidRedefinition, token, msg)
}

fn same_type(a: &Token, b: &Token) -> bool {
    a.kind == b.kind && a.lexeme == b.lexeme
}

fn merge_parent(class: &mut Class, parent: &Class) -> Result<()> {
    debug!("Merging {} into {}", parent.name(), class.name());

    if class.is_abstract() && parent.name() != OBJECT && !parent.is_abstract() {
        return Err(SemanticError::new(
            SemanticErrorKind::InvalidInheritance,
            &class.name,
            format!(
                "abstract class {} cannot extend concrete class {}",
                class.name(),
                parent.name()
            ),
        ));
    }

    for (name, attributes) in &parent.attributes {
        let slot = class.attributes.entry(name.clone()).or_default();

        for attribute in attributes {
            if !slot.iter().any(|a| a.owner == attribute.owner) {
                slot.push(attribute.clone());
            }
        }
    }

    class.ancestors.extend(parent.ancestors.iter().cloned());

    let mut overrides: Vec<&Method> = class
        .methods
        .values()
        .filter(|m| parent.methods.contains_key(&m.name.lexeme))
        .collect();
    overrides.sort_by_key(|m| m.name.line);

    for method in overrides {
        if let Some(inherited) = parent.methods.get(&method.name.lexeme) {
            check_redefinition(method, inherited)?;
        }
    }

    let mut inherited: Vec<&Method> = parent
        .methods
        .values()
        .filter(|m| !class.methods.contains_key(&m.name.lexeme))
        .collect();
    inherited.sort_by_key(|m| (m.name.line, m.name.lexeme.clone()));

    if let Some(missing) = inherited.iter().find(|m| m.is_abstract()) {
        if !class.is_abstract() {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidClassDeclaration,
                &class.name,
                format!(
                    "concrete class {} does not implement abstract method {}",
                    class.name(),
                    missing.name.lexeme
                ),
            ));
        }
    }

    let inherited: Vec<Method> = inherited.into_iter().cloned().collect();

    for method in inherited {
        class.methods.insert(method.name.lexeme.clone(), method);
    }

    class.consolidated = true;

    Ok(())
}

/// `method` redefines `inherited`; both signatures must agree.
fn check_redefinition(method: &Method, inherited: &Method) -> Result<()> {
    let name = &method.name;

    if inherited.is_final() || inherited.is_static() {
        return Err(redefinition(
            name,
            format!("final or static method {} cannot be redefined", name.lexeme),
        ));
    }

    if inherited.is_abstract() && method.is_abstract() {
        return Err(redefinition(
            name,
            format!("redefinition of abstract method {} cannot be abstract", name.lexeme),
        ));
    }

    if method.is_static() {
        return Err(redefinition(
            name,
            format!("redefinition of {} cannot be static", name.lexeme),
        ));
    }

    if method.params.len() != inherited.params.len() {
        return Err(redefinition(
            name,
            format!("redefinition of {} has a different number of parameters", name.lexeme),
        ));
    }

    if !same_type(&method.return_type, &inherited.return_type) {
        return Err(redefinition(
            name,
            format!("redefinition of {} has a different return type", name.lexeme),
        ));
    }

    for (position, param) in method.params.iter().enumerate() {
        let original = inherited
            .params
            .iter()
            .position(|p| p.name.lexeme == param.name.lexeme);

        if original != Some(position) {
            return Err(redefinition(
                name,
                format!("redefinition of {} changes the parameter order", name.lexeme),
            ));
        }

        if !same_type(&param.ty, &inherited.params[position].ty) {
            return Err(redefinition(
                &param.ty,
                format!("redefinition of {} changes the type of parameter {}", name.lexeme, param.name.lexeme),
            ));
        }
    }

    Ok(())
}
