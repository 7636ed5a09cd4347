use hashbrown::{HashMap, HashSet};
use log::*;
use tracing::instrument;

use mbl_ast::{DeclId, AST};

/// Give every declaration a name that is unique among its siblings.
///
/// Overloads are allowed to share a name as long as their parameter types differ. When two declarations collide the
/// first one keeps its name and later ones get a numeric suffix.
#[instrument(skip(ast), level = "debug")]
pub fn check_duplicated_names(ast: &mut AST) -> usize {
    let scopes = ast
        .walk()
        .into_iter()
        .filter(|id| !ast[*id].children().is_empty())
        .collect::<Vec<_>>();

    scopes.into_iter().map(|scope| check_scope(ast, scope)).sum()
}

fn check_scope(ast: &mut AST, scope: DeclId) -> usize {
    let children = ast[scope]
        .children()
        .iter()
        .copied()
        .filter(|c| !ast[*c].is_ignored())
        .collect::<Vec<_>>();

    let mut taken: HashSet<String> = children.iter().map(|c| ast[*c].name().to_string()).collect();
    let mut values: HashSet<String> = HashSet::new();
    let mut overloads: HashMap<String, Vec<String>> = HashMap::new();

    let mut renamed = 0;
    for child in children {
        let decl = &ast[child];
        let key = decl.as_function().map(|f| f.parameter_key());
        let mut name = decl.name().to_string();

        let collides = values.contains(&name)
            || match &key {
                Some(key) => overloads
                    .get(&name)
                    .map(|keys| keys.contains(key))
                    .unwrap_or(false),
                None => overloads.contains_key(&name),
            };

        if collides {
            let mut i = 1;
            let mut candidate = format!("{name}_{i}");
            while taken.contains(&candidate) {
                i += 1;
                candidate = format!("{name}_{i}");
            }

            warn!(
                "{:?} \"{}\" clashes with an earlier declaration, renaming it to \"{candidate}\"",
                decl.kind(),
                ast.qualified_name(child)
            );

            taken.insert(candidate.clone());
            ast[child].set_name(&candidate);
            name = candidate;
            renamed += 1;
        }

        match key {
            Some(key) => overloads.entry(name).or_default().push(key),
            None => {
                values.insert(name);
            }
        }
    }

    renamed
}
