//! Identity of stored billing records.

/// A record referenced by id and shown to users by a computed name.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Name used wherever the record is listed or referenced (e.g.
    /// `"acme-prod (0f5e6a)"` for a project).
    fn display_name(&self) -> String;
}
