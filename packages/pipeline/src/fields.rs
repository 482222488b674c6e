//! Field tables of the persisted entities.
//!
//! Each entity kind has a static table of its recognized columns: name,
//! default value, whether the column is part of the natural key, and the
//! comparator used to decide whether an incoming value differs from the
//! stored one. The reconciliation engine iterates these tables generically.

use std::fmt;

/// Compares an incoming value with a stored value; `true` means "unchanged".
pub type Comparator = fn(&str, &str) -> bool;

/// Exact value equality.
pub fn exact(incoming: &str, stored: &str) -> bool {
    incoming == stored
}

/// One recognized column of an entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub default: &'static str,
    /// Part of the natural key.
    pub key: bool,
    pub same: Comparator,
}

impl FieldSpec {
    const fn key(name: &'static str) -> Self {
        Self {
            name,
            default: "",
            key: true,
            same: exact,
        }
    }

    const fn value(name: &'static str) -> Self {
        Self {
            name,
            default: "",
            key: false,
            same: exact,
        }
    }
}

/// Columns of `lawtext_bern`, in insert order.
pub static LAW_TEXT_FIELDS: [FieldSpec; 8] = [
    FieldSpec::key("systematic_number"),
    FieldSpec::value("title"),
    FieldSpec::value("abbreviation"),
    FieldSpec::value("enactment"),
    FieldSpec::value("ingress_author"),
    FieldSpec::value("ingress_foundation"),
    FieldSpec::value("ingress_action"),
    FieldSpec::value("source_url"),
];

/// Columns of `articles_bern`, in insert order.
pub static ARTICLE_FIELDS: [FieldSpec; 14] = [
    FieldSpec::key("systematic_number"),
    FieldSpec::value("abbreviation"),
    FieldSpec::key("book_name"),
    FieldSpec::key("part_name"),
    FieldSpec::key("title_name"),
    FieldSpec::key("sub_title_name"),
    FieldSpec::key("chapter_name"),
    FieldSpec::key("sub_chapter_name"),
    FieldSpec::key("section_name"),
    FieldSpec::key("sub_section_name"),
    FieldSpec::key("article_number"),
    FieldSpec::key("article_title"),
    FieldSpec::key("paragraph_number"),
    FieldSpec::value("paragraph_text"),
];

/// The persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    LawText,
    Article,
}

impl EntityKind {
    /// Table holding current rows.
    pub fn table(self) -> &'static str {
        match self {
            Self::LawText => "lawtext_bern",
            Self::Article => "articles_bern",
        }
    }

    /// Table holding archived prior versions.
    pub fn history_table(self) -> &'static str {
        match self {
            Self::LawText => "lawtext_bern_history",
            Self::Article => "articles_bern_history",
        }
    }

    /// Surrogate identity column; the two tables spell it differently.
    pub fn id_column(self) -> &'static str {
        match self {
            Self::LawText => "ID",
            Self::Article => "id",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::LawText => &LAW_TEXT_FIELDS,
            Self::Article => &ARTICLE_FIELDS,
        }
    }

    pub fn key_fields(self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields().iter().filter(|spec| spec.key)
    }
}

/// A total set of field values for one entity, in field-table order.
///
/// Every recognized field is present; absent values hold the field default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields {
    kind: EntityKind,
    values: Vec<String>,
}

impl Fields {
    /// All fields at their defaults.
    pub fn defaults(kind: EntityKind) -> Self {
        Self {
            kind,
            values: kind.fields().iter().map(|spec| spec.default.to_string()).collect(),
        }
    }

    /// Build from a lookup function; fields it does not know take their default.
    pub fn from_fn(kind: EntityKind, mut value_of: impl FnMut(&FieldSpec) -> Option<String>) -> Self {
        Self {
            kind,
            values: kind
                .fields()
                .iter()
                .map(|spec| value_of(spec).unwrap_or_else(|| spec.default.to_string()))
                .collect(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, value)| value)
    }

    /// Set a recognized field. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.kind.fields().iter().position(|spec| spec.name == name) {
            Some(index) => {
                self.values[index] = value.into();
                true
            }
            None => false,
        }
    }

    /// `(spec, value)` pairs in field-table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        self.kind
            .fields()
            .iter()
            .zip(self.values.iter().map(String::as_str))
    }

    /// The natural key of these fields.
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey {
            kind: self.kind,
            values: self
                .iter()
                .filter(|(spec, _)| spec.key)
                .map(|(spec, value)| (spec.name, value.to_string()))
                .collect(),
        }
    }

    /// Fields whose value here should overwrite `stored`.
    ///
    /// A field is dirty when its value is non-empty and the comparator says it
    /// differs from the stored value. Empty values never mark a field dirty.
    pub fn dirty_against(&self, stored: &Fields) -> Vec<DirtyField> {
        self.iter()
            .zip(stored.iter())
            .filter(|((spec, incoming), (_, current))| {
                !incoming.is_empty() && !(spec.same)(incoming, current)
            })
            .map(|((spec, incoming), _)| DirtyField {
                name: spec.name,
                value: incoming.to_string(),
            })
            .collect()
    }
}

/// A field staged for update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyField {
    pub name: &'static str,
    pub value: String,
}

/// The natural key of an entity: its key fields and their values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    kind: EntityKind,
    values: Vec<(&'static str, String)>,
}

impl NaturalKey {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// `(column, value)` pairs in field-table order.
    pub fn values(&self) -> &[(&'static str, String)] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(column, _)| *column == name)
            .map(|(_, value)| value.as_str())
    }

    /// The systematic number shared by both entity kinds.
    pub fn systematic_number(&self) -> &str {
        self.get("systematic_number").unwrap_or_default()
    }
}

impl fmt::Display for NaturalKey {
    /// Lists only non-empty key values, e.g. `systematic_number=101.1, article_number=Art. 1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (column, value) in self.values.iter().filter(|(_, v)| !v.is_empty()) {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{column}={value}")?;
            first = false;
        }
        if first {
            f.write_str("(empty key)")?;
        }
        Ok(())
    }
}
