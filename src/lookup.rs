/// Point lookup against a listing: either the numeric-looking id string or the screen name.
///
/// Matching is exact string equality in both cases. Screen names are case-insensitive handles on
/// the remote side, but folding case here would diverge from what the remote returns; display and
/// diff comparisons do their own folding (see [`crate::screen_name_diff_suppressed`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    ById(String),
    ByName(String),
}

impl LookupKey {
    pub fn by_id(id: impl Into<String>) -> Self {
        LookupKey::ById(id.into())
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        LookupKey::ByName(name.into())
    }

    pub fn matches<T: Identified + ?Sized>(&self, entity: &T) -> bool {
        match self {
            LookupKey::ById(id) => entity.id_str() == id,
            LookupKey::ByName(name) => entity.screen_name() == name,
        }
    }
}

/// Entities that can be found by a [`LookupKey`].
pub trait Identified {
    fn id_str(&self) -> &str;
    fn screen_name(&self) -> &str;
}

/// Resolves every key against the same listing snapshot.
///
/// The result has one slot per key, in key order. The first listing entry that matches wins; keys
/// with no match resolve to `None`.
pub fn scan<'a, T: Identified>(keys: &[LookupKey], listing: &'a [T]) -> Vec<Option<&'a T>> {
    keys.iter().map(|key| listing.iter().find(|entity| key.matches(*entity))).collect()
}
