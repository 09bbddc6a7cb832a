//! Textual encoding of a note's category membership.
//!
//! A note's categories travel over the API as a comma-separated list of
//! decimal ids (`"2,5,9"`), in the order they were assigned. The relation
//! itself is stored as ordered rows in `note_category_links`; this module
//! only converts between that ordered id list and its string form.
//!
//! - [`decode`] parses the string form, rejecting malformed segments with a
//!   typed error instead of failing somewhere downstream.
//! - [`encode`] joins ids back together. An empty set encodes to `None`,
//!   never to an empty string.

use crate::types::DbId;

/// Separator between ids in the encoded form.
pub const SEPARATOR: char = ',';

/// Anything that carries a category id.
pub trait CategoryId {
    fn category_id(&self) -> DbId;
}

impl CategoryId for DbId {
    fn category_id(&self) -> DbId {
        *self
    }
}

impl<T: CategoryId + ?Sized> CategoryId for &T {
    fn category_id(&self) -> DbId {
        (**self).category_id()
    }
}

/// Failure to decode an encoded category list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryIdsError {
    /// A segment is empty, not an integer, or not a positive id.
    #[error("invalid category id '{segment}' at position {position}")]
    Malformed { segment: String, position: usize },
}

/// Decode an encoded category list into ids, preserving order.
///
/// `None`, `""` and whitespace-only input decode to an empty list. Each
/// segment is trimmed before parsing.
///
/// ```
/// use notekeep_core::category_ids::decode;
/// assert_eq!(decode(Some("2, 5,9")).unwrap(), vec![2, 5, 9]);
/// assert_eq!(decode(None).unwrap(), Vec::<i64>::new());
/// assert!(decode(Some("2,x")).is_err());
/// ```
pub fn decode(field: Option<&str>) -> Result<Vec<DbId>, CategoryIdsError> {
    let field = match field.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(f) => f,
    };

    field
        .split(SEPARATOR)
        .enumerate()
        .map(|(position, raw)| {
            let segment = raw.trim();
            match segment.parse::<DbId>() {
                Ok(id) if id > 0 => Ok(id),
                _ => Err(CategoryIdsError::Malformed {
                    segment: segment.to_string(),
                    position,
                }),
            }
        })
        .collect()
}

/// Encode categories as a comma-separated id list in input order.
///
/// Returns `None` for an empty slice.
///
/// ```
/// use notekeep_core::category_ids::encode;
/// assert_eq!(encode(&[2_i64, 9]), Some("2,9".to_string()));
/// assert_eq!(encode::<i64>(&[]), None);
/// ```
pub fn encode<T: CategoryId>(categories: &[T]) -> Option<String> {
    if categories.is_empty() {
        return None;
    }
    let joined = categories
        .iter()
        .map(|c| c.category_id().to_string())
        .collect::<Vec<_>>()
        .join(",");
    Some(joined)
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup(ids: &[DbId]) -> Vec<DbId> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Serde helper: serialize an id list in its encoded form (`null` when empty).
pub fn serialize_encoded<T, S>(ids: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[DbId]> + ?Sized,
    S: serde::Serializer,
{
    serde::Serialize::serialize(&encode(ids.as_ref()), serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    struct Cat(DbId);

    impl CategoryId for Cat {
        fn category_id(&self) -> DbId {
            self.0
        }
    }

    #[test]
    fn empty_inputs_decode_to_nothing() {
        assert_eq!(decode(None).unwrap(), Vec::<DbId>::new());
        assert_eq!(decode(Some("")).unwrap(), Vec::<DbId>::new());
        assert_eq!(decode(Some("   ")).unwrap(), Vec::<DbId>::new());
    }

    #[test]
    fn empty_slice_encodes_to_none() {
        assert_eq!(encode::<Cat>(&[]), None);
    }

    #[test]
    fn round_trip_keeps_insertion_order() {
        let cats = vec![Cat(9), Cat(2), Cat(5)];
        let encoded = encode(&cats).unwrap();
        assert_eq!(encoded, "9,2,5");
        assert_eq!(decode(Some(&encoded)).unwrap(), vec![9, 2, 5]);
    }

    #[test]
    fn round_trip_single_category() {
        let encoded = encode(&[Cat(12)]);
        assert_eq!(encoded.as_deref(), Some("12"));
        assert_eq!(decode(encoded.as_deref()).unwrap(), vec![12]);
    }

    #[test]
    fn references_encode_like_values() {
        let a = Cat(3);
        let b = Cat(4);
        assert_eq!(encode(&[&a, &b]).as_deref(), Some("3,4"));
    }

    #[test]
    fn whitespace_around_segments_is_ignored() {
        assert_eq!(decode(Some(" 2 , 5,9 ")).unwrap(), vec![2, 5, 9]);
    }

    #[test]
    fn non_integer_segment_is_rejected() {
        let err = decode(Some("2,abc,9")).unwrap_err();
        assert_matches!(
            err,
            CategoryIdsError::Malformed { ref segment, position: 1 } if segment == "abc"
        );
    }

    #[test]
    fn empty_segment_is_rejected() {
        assert_matches!(
            decode(Some("2,,9")),
            Err(CategoryIdsError::Malformed { position: 1, .. })
        );
        assert_matches!(
            decode(Some("2,")),
            Err(CategoryIdsError::Malformed { position: 1, .. })
        );
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        assert!(decode(Some("0")).is_err());
        assert!(decode(Some("3,-1")).is_err());
    }

    #[test]
    fn error_message_names_the_segment() {
        let err = decode(Some("7,x1")).unwrap_err();
        assert_eq!(err.to_string(), "invalid category id 'x1' at position 1");
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup(&[5, 2, 5, 9, 2]), vec![5, 2, 9]);
        assert_eq!(dedup(&[]), Vec::<DbId>::new());
    }

    #[test]
    fn serialize_encoded_writes_string_or_null() {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(serialize_with = "serialize_encoded")]
            category_ids: Vec<DbId>,
        }

        let full = serde_json::to_value(Wrapper { category_ids: vec![2, 9] }).unwrap();
        assert_eq!(full["category_ids"], "2,9");

        let empty = serde_json::to_value(Wrapper { category_ids: vec![] }).unwrap();
        assert!(empty["category_ids"].is_null());
    }
}
