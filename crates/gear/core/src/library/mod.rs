//! The configuration library: named, layered equipment sets.
//!
//! Sets are declared as a list of [`SetDecl`]s. A declaration may name base sets;
//! its own slots are then layered over the composition of those bases. The
//! [`SetLibraryBuilder`] resolves every declaration once, in dependency order,
//! and the resulting [`SetLibrary`] only ever hands out cached fragments.
mod error;
mod path;

pub use error::LibraryError;
pub use path::SetPath;

use std::collections::{BTreeMap, HashMap};

use crate::state::{Fragment, compose};

/// Declaration of one library set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetDecl {
    pub path: SetPath,
    /// Sets composed left to right before `slots` is layered on top.
    pub bases: Vec<SetPath>,
    pub slots: Fragment,
}

impl SetDecl {
    /// A set defined directly by its slots.
    pub fn plain(path: SetPath, slots: Fragment) -> Self {
        Self {
            path,
            bases: Vec::new(),
            slots,
        }
    }

    /// A set defined as `compose(base, slots)`.
    pub fn layered(path: SetPath, base: SetPath, slots: Fragment) -> Self {
        Self {
            path,
            bases: vec![base],
            slots,
        }
    }
}

/// Collects declarations and resolves them into a [`SetLibrary`].
#[derive(Clone, Debug, Default)]
pub struct SetLibraryBuilder {
    decls: Vec<SetDecl>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl SetLibraryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(mut self, decl: SetDecl) -> Self {
        self.decls.push(decl);
        self
    }

    pub fn push(&mut self, decl: SetDecl) {
        self.decls.push(decl);
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Resolves every declared composition.
    ///
    /// # Errors
    ///
    /// - `LibraryError::DuplicateSet` if a path is declared twice
    /// - `LibraryError::UnknownCategory` if a base names an undeclared set
    /// - `LibraryError::CyclicComposition` if bases form a cycle
    pub fn build(self) -> Result<SetLibrary, LibraryError> {
        let mut decls: HashMap<SetPath, SetDecl> = HashMap::with_capacity(self.decls.len());
        for decl in self.decls {
            if decls.contains_key(&decl.path) {
                return Err(LibraryError::DuplicateSet { path: decl.path });
            }
            decls.insert(decl.path.clone(), decl);
        }

        let mut resolved: BTreeMap<SetPath, Fragment> = BTreeMap::new();
        let mut visits: HashMap<SetPath, Visit> = HashMap::new();

        // Sorted so the first reported error is stable across runs.
        let mut order: Vec<&SetPath> = decls.keys().collect();
        order.sort();
        for path in order {
            let mut stack = Vec::new();
            resolve(path, &decls, &mut resolved, &mut visits, &mut stack)?;
        }

        tracing::debug!(sets = resolved.len(), "set library resolved");
        Ok(SetLibrary { sets: resolved })
    }
}

fn resolve(
    path: &SetPath,
    decls: &HashMap<SetPath, SetDecl>,
    resolved: &mut BTreeMap<SetPath, Fragment>,
    visits: &mut HashMap<SetPath, Visit>,
    stack: &mut Vec<SetPath>,
) -> Result<(), LibraryError> {
    match visits.get(path) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::InProgress) => {
            let start = stack.iter().position(|p| p == path).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..].iter().map(ToString::to_string).collect();
            cycle.push(path.to_string());
            return Err(LibraryError::CyclicComposition {
                cycle: cycle.join(" -> "),
            });
        }
        None => {}
    }

    let decl = decls.get(path).ok_or_else(|| LibraryError::UnknownCategory {
        path: path.clone(),
        referenced_by: stack.last().cloned(),
    })?;

    visits.insert(path.clone(), Visit::InProgress);
    stack.push(path.clone());

    let mut fragment = Fragment::empty();
    for base in &decl.bases {
        resolve(base, decls, resolved, visits, stack)?;
        if let Some(base_fragment) = resolved.get(base) {
            fragment = compose(&fragment, base_fragment);
        }
    }
    fragment = compose(&fragment, &decl.slots);

    stack.pop();
    visits.insert(path.clone(), Visit::Done);
    resolved.insert(path.clone(), fragment);
    Ok(())
}

/// Resolved, immutable set library.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetLibrary {
    sets: BTreeMap<SetPath, Fragment>,
}

impl SetLibrary {
    pub fn builder() -> SetLibraryBuilder {
        SetLibraryBuilder::new()
    }

    /// Looks up a set by exact path.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UnknownCategory` if no set is registered under
    /// `path`. An unknown path is never treated as an empty set.
    pub fn get(&self, path: &SetPath) -> Result<&Fragment, LibraryError> {
        self.sets
            .get(path)
            .ok_or_else(|| LibraryError::UnknownCategory {
                path: path.clone(),
                referenced_by: None,
            })
    }

    pub fn contains(&self, path: &SetPath) -> bool {
        self.sets.contains_key(path)
    }

    /// Selects the most specific refinement of `base` along `qualifiers`.
    ///
    /// `base` must exist. Each qualifier is followed only while the refined
    /// path exists; the walk stops at the first missing refinement. Returns the
    /// path actually selected together with its fragment.
    pub fn select<'q, Q>(
        &self,
        base: &SetPath,
        qualifiers: Q,
    ) -> Result<(SetPath, &Fragment), LibraryError>
    where
        Q: IntoIterator<Item = &'q str>,
    {
        let mut selected = base.clone();
        let mut fragment = self.get(base)?;

        for qualifier in qualifiers {
            let refined = selected.child(qualifier);
            match self.sets.get(&refined) {
                Some(found) => {
                    selected = refined;
                    fragment = found;
                }
                None => break,
            }
        }

        Ok((selected, fragment))
    }

    /// Iterates all sets in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&SetPath, &Fragment)> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
