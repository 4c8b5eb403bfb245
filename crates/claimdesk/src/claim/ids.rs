use uuid::Uuid;

/// Prefix of every generated claim id.
pub const CLAIM_ID_PREFIX: &str = "CLM-";

/// Source of unique identifiers for claims and media files.
///
/// Ids must never repeat; ordering by creation is not guaranteed.
pub trait IdGenerator: Send + Sync {
    fn claim_id(&self) -> String;
    fn media_id(&self) -> String;
}

/// UUIDv4-backed generator.
///
/// Claim ids read as `CLM-` followed by the uppercase simple form of a
/// random UUID; media ids are plain hyphenated UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn claim_id(&self) -> String {
        format!(
            "{}{}",
            CLAIM_ID_PREFIX,
            Uuid::new_v4().simple().to_string().to_uppercase()
        )
    }

    fn media_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
