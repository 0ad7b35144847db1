use crate::tree::{TagDocument, TagKind, TagPath};

/// Give a consolidated document the root its target expects.
///
/// An empty base makes the root the provider (empty name); otherwise the root is a folder
/// named after the base's last segment. Every other root property is left alone.
pub fn normalize_root(doc: &mut TagDocument, base: &TagPath) {
    match base.last() {
        None => {
            doc.name = Some(String::new());
            doc.kind = Some(TagKind::Provider);
        }
        Some(last) => {
            doc.name = Some(last.to_string());
            doc.kind = Some(TagKind::Folder);
        }
    }
}
