//! Classification tables and the action classifier.

use std::collections::BTreeSet;

use super::ActionDescriptor;

/// Attribute that governs how well the actions in a table perform.
///
/// The declaration order is the classifier's priority order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TableKind {
    /// Enfeebles whose potency scales with enfeebling skill.
    SkillEnfeebling,
    /// Enfeebles whose potency scales with MND.
    MndEnfeebling,
    /// Enfeebles whose potency scales with INT.
    IntEnfeebling,
    /// Enfeebles where duration is the only thing that matters (sleeps).
    DurationEnfeebling,
    /// Enhancing spells whose potency scales with enhancing skill.
    SkillEnhancing,
}

impl TableKind {
    /// All kinds in classifier priority order.
    pub const PRIORITY: [TableKind; 5] = [
        TableKind::SkillEnfeebling,
        TableKind::MndEnfeebling,
        TableKind::IntEnfeebling,
        TableKind::DurationEnfeebling,
        TableKind::SkillEnhancing,
    ];

    /// Returns true for the tables governed by a primary stat.
    pub const fn is_primary_stat(&self) -> bool {
        matches!(self, TableKind::MndEnfeebling | TableKind::IntEnfeebling)
    }
}

/// Set of action names sharing one governing attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationTable {
    kind: TableKind,
    category: String,
    members: BTreeSet<String>,
}

impl ClassificationTable {
    pub fn new<I, S>(kind: TableKind, category: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            category: category.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Category returned for members of this table.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, action: &str) -> bool {
        self.members.contains(action)
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// An action name listed in more than one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableOverlap {
    pub action: String,
    /// The table that wins under first-match priority.
    pub winner: TableKind,
    pub shadowed: TableKind,
}

/// The classifier: tables tested in fixed priority order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassificationTables {
    tables: Vec<ClassificationTable>,
}

impl ClassificationTables {
    /// Orders `tables` by [`TableKind::PRIORITY`].
    ///
    /// Tables of the same kind keep their relative order. Overlapping members
    /// are not rejected; see [`ClassificationTables::overlaps`].
    pub fn new(mut tables: Vec<ClassificationTable>) -> Self {
        tables.sort_by_key(|table| table.kind);
        Self { tables }
    }

    /// Returns the first table (in priority order) listing `action`.
    pub fn table_for(&self, action: &str) -> Option<&ClassificationTable> {
        self.tables.iter().find(|table| table.contains(action))
    }

    /// Returns the first table of the given kind.
    pub fn table(&self, kind: TableKind) -> Option<&ClassificationTable> {
        self.tables.iter().find(|table| table.kind == kind)
    }

    /// Maps an action to its category.
    ///
    /// Returns the category of the first table listing the action's name, or
    /// `default_category` unchanged when no table matches.
    pub fn classify<'a>(&'a self, action: &ActionDescriptor, default_category: &'a str) -> &'a str {
        self.table_for(&action.name)
            .map(ClassificationTable::category)
            .unwrap_or(default_category)
    }

    /// Returns the kind of the table that classifies `action`, if any.
    pub fn kind_of(&self, action: &ActionDescriptor) -> Option<TableKind> {
        self.table_for(&action.name).map(ClassificationTable::kind)
    }

    /// Lists every action name that appears in more than one table.
    pub fn overlaps(&self) -> Vec<TableOverlap> {
        let mut overlaps = Vec::new();
        for (idx, winner) in self.tables.iter().enumerate() {
            for shadowed in &self.tables[idx + 1..] {
                for action in winner.members.intersection(&shadowed.members) {
                    // Only report against the first table that actually wins.
                    if self.table_for(action).map(|t| t.kind) == Some(winner.kind) {
                        overlaps.push(TableOverlap {
                            action: action.clone(),
                            winner: winner.kind,
                            shadowed: shadowed.kind,
                        });
                    }
                }
            }
        }
        overlaps
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
