use std::fmt;

/// Lookup operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    // Null handling
    /// `isnull = true|false`
    IsNull,

    // Comparison
    /// Equality (`exact`, also the implicit lookup)
    Exact,
    /// Membership in a literal list (`in`)
    In,
    /// Greater than (`gt`)
    Gt,
    /// Greater than or equal (`gte`)
    Gte,
    /// Less than (`lt`)
    Lt,
    /// Less than or equal (`lte`)
    Lte,

    // Text
    /// Substring (`contains`)
    Contains,
    /// Prefix (`startswith`)
    StartsWith,
    /// Suffix (`endswith`)
    EndsWith,
    /// Regular expression search (`regex`)
    Regex,

    // Document keys
    /// Object has the given key (`has_key`)
    HasKey,
    /// Object has every listed key (`has_keys`)
    HasKeys,
    /// Object has at least one listed key (`has_any_keys`)
    HasAnyKeys,
}

impl LookupKind {
    pub const ALL: [LookupKind; 14] = [
        LookupKind::IsNull,
        LookupKind::Exact,
        LookupKind::In,
        LookupKind::Gt,
        LookupKind::Gte,
        LookupKind::Lt,
        LookupKind::Lte,
        LookupKind::Contains,
        LookupKind::StartsWith,
        LookupKind::EndsWith,
        LookupKind::Regex,
        LookupKind::HasKey,
        LookupKind::HasKeys,
        LookupKind::HasAnyKeys,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LookupKind::IsNull => "isnull",
            LookupKind::Exact => "exact",
            LookupKind::In => "in",
            LookupKind::Gt => "gt",
            LookupKind::Gte => "gte",
            LookupKind::Lt => "lt",
            LookupKind::Lte => "lte",
            LookupKind::Contains => "contains",
            LookupKind::StartsWith => "startswith",
            LookupKind::EndsWith => "endswith",
            LookupKind::Regex => "regex",
            LookupKind::HasKey => "has_key",
            LookupKind::HasKeys => "has_keys",
            LookupKind::HasAnyKeys => "has_any_keys",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
