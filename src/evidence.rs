//! Pending photo evidence: capped, ordered batches per logical slot.
//!
//! Files live entirely in memory until the submission pipeline uploads them.
//! Each file carries a derived preview URL for the rendering layer; removal
//! (or discarding the draft) revokes the preview.
//!
//! Slots gated by a conditional fact keep their contents when the fact flips
//! off — the slot is merely hidden, and re-enabling the fact brings the
//! attachments back. The payload builder skips hidden slots, so a false fact
//! can never leak references into a submission.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::EngineError;

/// One not-yet-uploaded attachment held in memory.
#[derive(Clone, Debug)]
pub struct PendingFile {
    /// Stable id, also the basis of the preview URL.
    pub id: Uuid,
    /// Original file name, shown in the slot and sent on upload.
    pub filename: String,
    /// MIME type reported by the picker.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl PendingFile {
    /// Wrap picked file data with a fresh id.
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// In-memory preview URL for the rendering layer. Valid until the file
    /// is removed or the draft is discarded.
    pub fn preview_url(&self) -> String {
        format!("memory://evidence/{}", self.id)
    }
}

/// All evidence batches of one draft, keyed by slot id.
#[derive(Clone, Debug, Default)]
pub struct EvidenceBatches {
    slots: BTreeMap<&'static str, Vec<PendingFile>>,
}

impl EvidenceBatches {
    /// No batches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to a slot, refusing once the slot is at capacity. The
    /// slot's existing contents are untouched on refusal.
    pub fn add(
        &mut self,
        slot: &'static str,
        capacity: usize,
        file: PendingFile,
    ) -> Result<(), EngineError> {
        let batch = self.slots.entry(slot).or_default();
        if batch.len() >= capacity {
            return Err(EngineError::CapacityExceeded { slot, capacity });
        }
        tracing::debug!("evidence added: slot={slot} file={}", file.filename);
        batch.push(file);
        Ok(())
    }

    /// Remove one file by position, revoking its preview. Out-of-range
    /// indexes are a no-op returning `None`.
    pub fn remove(&mut self, slot: &str, index: usize) -> Option<PendingFile> {
        let batch = self.slots.get_mut(slot)?;
        if index >= batch.len() {
            return None;
        }
        let file = batch.remove(index);
        tracing::debug!("evidence preview revoked: {}", file.preview_url());
        Some(file)
    }

    /// The files currently in a slot, in attach order.
    pub fn files(&self, slot: &str) -> &[PendingFile] {
        self.slots.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no slot holds any file.
    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }

    /// Drop every pending file, revoking all previews. Used on cancel and
    /// after a successful submission.
    pub fn release_all(&mut self) {
        for (slot, batch) in &self.slots {
            for file in batch {
                tracing::debug!("evidence preview revoked: slot={slot} {}", file.preview_url());
            }
        }
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> PendingFile {
        PendingFile::new(name, "image/jpeg", vec![0xff, 0xd8])
    }

    #[test]
    fn capacity_is_enforced_and_contents_survive_refusal() {
        let mut batches = EvidenceBatches::new();
        for i in 0..4 {
            batches.add("damage_photos", 4, file(&format!("dmg{i}.jpg"))).unwrap();
        }
        let err = batches.add("damage_photos", 4, file("one_too_many.jpg"));
        assert!(matches!(
            err,
            Err(EngineError::CapacityExceeded { slot: "damage_photos", capacity: 4 })
        ));
        let names: Vec<_> = batches.files("damage_photos").iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["dmg0.jpg", "dmg1.jpg", "dmg2.jpg", "dmg3.jpg"]);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut batches = EvidenceBatches::new();
        batches.add("general_photos_1", 4, file("a.jpg")).unwrap();
        batches.add("general_photos_1", 4, file("b.jpg")).unwrap();
        batches.add("general_photos_1", 4, file("c.jpg")).unwrap();

        let removed = batches.remove("general_photos_1", 1).unwrap();
        assert_eq!(removed.filename, "b.jpg");
        let names: Vec<_> = batches.files("general_photos_1").iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["a.jpg", "c.jpg"]);
        assert!(batches.remove("general_photos_1", 5).is_none());
    }

    #[test]
    fn preview_url_is_derived_from_the_file_id() {
        let f = file("serve.jpg");
        assert_eq!(f.preview_url(), format!("memory://evidence/{}", f.id));
    }

    #[test]
    fn release_all_empties_every_slot() {
        let mut batches = EvidenceBatches::new();
        batches.add("serve_photo", 4, file("serve.jpg")).unwrap();
        batches.add("damage_photos", 4, file("dmg.jpg")).unwrap();
        batches.release_all();
        assert!(batches.is_empty());
        assert!(batches.files("serve_photo").is_empty());
    }
}
