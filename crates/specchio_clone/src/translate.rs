//! Permission overwrite translation.

use specchio_core::{OverwriteKind, OverwriteRecord, PermissionGrant, RemapTable};

/// Rewrites access-control entries from source role ids to target role ids.
///
/// Role-kind entries are looked up in the role remap; an unmapped id equal
/// to the source's default role id substitutes the target's default role.
/// Entries with no target mapping are dropped, and member-kind entries are
/// always dropped — member ids are not portable across guilds. Output order
/// carries no meaning; consumers treat it as an unordered association.
///
/// Translation is pure: running it twice against an unchanged remap yields
/// identical output.
#[derive(Debug, Clone, Copy)]
pub struct OverwriteTranslator<'a> {
    remap: &'a RemapTable,
    source_default_role: u64,
    target_default_role: u64,
}

impl<'a> OverwriteTranslator<'a> {
    /// Create a translator over the current remap state.
    pub fn new(remap: &'a RemapTable, source_default_role: u64, target_default_role: u64) -> Self {
        Self {
            remap,
            source_default_role,
            target_default_role,
        }
    }

    /// Translate a source overwrite list into target permission grants.
    pub fn translate(&self, overwrites: &[OverwriteRecord]) -> Vec<PermissionGrant> {
        overwrites
            .iter()
            .filter_map(|overwrite| match overwrite.kind() {
                OverwriteKind::Role => {
                    let target = self.remap.role(*overwrite.id()).or_else(|| {
                        (*overwrite.id() == self.source_default_role)
                            .then_some(self.target_default_role)
                    })?;
                    Some(PermissionGrant::new(
                        target,
                        *overwrite.allow(),
                        *overwrite.deny(),
                    ))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specchio_core::OverwriteRecordBuilder;

    fn overwrite(kind: OverwriteKind, id: u64, allow: u64, deny: u64) -> OverwriteRecord {
        OverwriteRecordBuilder::default()
            .kind(kind)
            .id(id)
            .allow(allow)
            .deny(deny)
            .build()
            .unwrap()
    }

    #[test]
    fn test_mapped_role_is_translated() {
        let mut remap = RemapTable::new();
        remap.record_role(10, 110);
        let translator = OverwriteTranslator::new(&remap, 1, 1000);

        let grants = translator.translate(&[overwrite(OverwriteKind::Role, 10, 1024, 2048)]);

        assert_eq!(grants, vec![PermissionGrant::new(110, 1024, 2048)]);
    }

    #[test]
    fn test_unmapped_role_is_dropped() {
        let remap = RemapTable::new();
        let translator = OverwriteTranslator::new(&remap, 1, 1000);

        let grants = translator.translate(&[overwrite(OverwriteKind::Role, 77, 1024, 0)]);

        assert!(grants.is_empty());
    }

    #[test]
    fn test_source_default_substitutes_target_default() {
        let remap = RemapTable::new();
        let translator = OverwriteTranslator::new(&remap, 1, 1000);

        let grants = translator.translate(&[overwrite(OverwriteKind::Role, 1, 0, 8192)]);

        assert_eq!(grants, vec![PermissionGrant::new(1000, 0, 8192)]);
    }

    #[test]
    fn test_member_entries_always_dropped() {
        let mut remap = RemapTable::new();
        remap.record_role(10, 110);
        let translator = OverwriteTranslator::new(&remap, 1, 1000);

        let grants = translator.translate(&[
            overwrite(OverwriteKind::Member, 10, 1024, 0),
            overwrite(OverwriteKind::Role, 10, 512, 0),
        ]);

        assert_eq!(grants, vec![PermissionGrant::new(110, 512, 0)]);
    }

    #[test]
    fn test_translation_is_idempotent() {
        let mut remap = RemapTable::new();
        remap.record_role(10, 110);
        remap.record_role(11, 111);
        let translator = OverwriteTranslator::new(&remap, 1, 1000);

        let overwrites = vec![
            overwrite(OverwriteKind::Role, 10, 1, 2),
            overwrite(OverwriteKind::Member, 99, 4, 8),
            overwrite(OverwriteKind::Role, 11, 16, 32),
            overwrite(OverwriteKind::Role, 1, 64, 128),
        ];

        let first = translator.translate(&overwrites);
        let second = translator.translate(&overwrites);

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
